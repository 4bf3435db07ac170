pub mod config;
pub mod error;
pub mod service;
pub mod types;

pub use config::GleansterSettings;
pub use error::{GleansterError, GleansterResult};
pub use service::TrackingService;
pub use types::{PropertyMap, TrackedEvent};
