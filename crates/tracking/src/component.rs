//! Minimal component model — named value props, named callback slots, and a
//! `Component` trait that renders props into some output.
//!
//! A component's props are a mapping from slot name to either a JSON value or
//! a callable [`Handler`]. Decorators operate on the handler slots by name and
//! pass everything else through untouched.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use gleanster_core::service::short_type_name;
use gleanster_core::PropertyMap;
use serde_json::Value;

/// A callback prop. Receives the interaction's call arguments.
pub type Handler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&[Value]) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Props passed to a component: plain values plus callback slots.
#[derive(Clone, Default)]
pub struct Props {
    values: PropertyMap,
    handlers: BTreeMap<String, Handler>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a value prop.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder: set a callback prop.
    pub fn with_handler<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.set_handler(name, Arc::new(f));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn set_handler(&mut self, name: impl Into<String>, handler: Handler) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Convenience accessor for string value props.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn remove_handler(&mut self, name: &str) -> Option<Handler> {
        self.handlers.remove(name)
    }

    /// True if either a value or a handler exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name) || self.handlers.contains_key(name)
    }

    pub fn values(&self) -> &PropertyMap {
        &self.values
    }

    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Invoke the handler under `name`, if any. Returns whether one ran.
    pub fn fire(&self, name: &str, args: &[Value]) -> bool {
        match self.handlers.get(name) {
            Some(handler) => {
                handler(args);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("values", &self.values)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<PropertyMap> for Props {
    fn from(values: PropertyMap) -> Self {
        Self {
            values,
            handlers: BTreeMap::new(),
        }
    }
}

/// A renderable component.
pub trait Component {
    type Props;
    type Output;

    /// Name used for debugging and introspection. Defaults to the type name.
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name(std::any::type_name::<Self>()))
    }

    fn render(&self, props: Self::Props) -> Self::Output;
}

/// A component backed by a closure.
pub struct FnComponent<F> {
    name: Option<String>,
    render: F,
}

/// Adapt a closure into a named [`Component`] over [`Props`].
pub fn component_fn<F, O>(name: impl Into<String>, render: F) -> FnComponent<F>
where
    F: Fn(Props) -> O,
{
    FnComponent {
        name: Some(name.into()),
        render,
    }
}

/// Adapt a closure without declaring a display name.
pub fn anonymous_component<F, O>(render: F) -> FnComponent<F>
where
    F: Fn(Props) -> O,
{
    FnComponent { name: None, render }
}

impl<F, O> Component for FnComponent<F>
where
    F: Fn(Props) -> O,
{
    type Props = Props;
    type Output = O;

    fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Borrowed("FnComponent"),
        }
    }

    fn render(&self, props: Props) -> O {
        (self.render)(props)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Button;

    impl Component for Button {
        type Props = Props;
        type Output = Props;

        fn render(&self, props: Props) -> Props {
            props
        }
    }

    #[test]
    fn test_props_values_and_handlers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let props = Props::new()
            .with("label", "Buy")
            .with("count", 3)
            .with_handler("onClick", move |args| {
                assert_eq!(args, &[json!("click")]);
                counter.fetch_add(1, Ordering::SeqCst);
            });

        assert_eq!(props.get_str("label"), Some("Buy"));
        assert_eq!(props.get("count"), Some(&json!(3)));
        assert!(props.contains("onClick"));
        assert!(!props.contains("onFocus"));

        assert!(props.fire("onClick", &[json!("click")]));
        assert!(!props.fire("onFocus", &[]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_lists_handler_names() {
        let props = Props::new().with_handler("onClick", |_| {});
        let debug = format!("{props:?}");
        assert!(debug.contains("onClick"));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Button.display_name(), "Button");
        assert_eq!(component_fn("Link", |p: Props| p).display_name(), "Link");
        assert_eq!(anonymous_component(|p: Props| p).display_name(), "FnComponent");
    }
}
