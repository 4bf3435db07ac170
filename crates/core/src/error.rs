use thiserror::Error;

pub type GleansterResult<T> = Result<T, GleansterError>;

#[derive(Error, Debug)]
pub enum GleansterError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Tracking service `{service}` failed to initialize: {source}")]
    ServiceInit {
        service: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Event properties must be an object, got {0}")]
    InvalidProperties(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
