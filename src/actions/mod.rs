//! Action dispatch
//!
//! Named handlers registered by the host at startup. Executing an item
//! looks up its action handler and passes the argument selected by
//! modifier priority; an unknown action name is silently ignored.

use crate::results::ResultItem;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Handler invoked with the resolved argument of an executed item
pub type ActionHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Action name reserved for clipboard writes
pub const COPY_ACTION: &str = "copy";

/// Table of named action handlers
#[derive(Default, Clone)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Invoke the handler registered under `name`, if any
    pub fn dispatch(&self, name: &str, arg: &Value) {
        match self.handlers.get(name) {
            Some(handler) => handler(arg),
            None => debug!("no handler for action '{name}', ignoring"),
        }
    }

    /// Execute an item: resolve its argument by modifier priority and
    /// dispatch to the named action. Items without any argument are
    /// dispatched with `null`.
    pub fn execute_item(
        &self,
        action: &str,
        item: &ResultItem,
        is_super_mod: bool,
        is_alt_mod: bool,
    ) {
        let arg = item
            .resolved_arg(is_super_mod, is_alt_mod)
            .cloned()
            .unwrap_or(Value::Null);
        self.dispatch(action, &arg);
    }

    /// Copy an item's payload: `text.copy` override, else its default
    /// argument as a string
    pub fn copy_item(&self, item: &ResultItem) {
        if let Some(text) = item.copy_text() {
            self.dispatch(COPY_ACTION, &Value::String(text));
        } else {
            debug!("item '{}' has nothing to copy", item.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ModPayload, Mods};
    use serde_json::json;
    use std::sync::Mutex;

    fn recording_registry() -> (ActionRegistry, Arc<Mutex<Vec<(String, Value)>>>) {
        let record: Arc<Mutex<Vec<(String, Value)>>> = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ActionRegistry::new();
        for name in ["open", COPY_ACTION] {
            let record = record.clone();
            registry.register(name, move |arg: &Value| {
                record.lock().unwrap().push((name.to_string(), arg.clone()));
            });
        }
        (registry, record)
    }

    #[test]
    fn unknown_action_is_silently_ignored() {
        let (registry, record) = recording_registry();
        registry.dispatch("launch-missiles", &json!(1));
        assert!(record.lock().unwrap().is_empty());
    }

    #[test]
    fn execute_respects_modifier_priority() {
        let (registry, record) = recording_registry();
        let item = ResultItem {
            mods: Some(Mods {
                super_mod: Some(ModPayload {
                    arg: Some(json!("super")),
                    ..Default::default()
                }),
                alt: Some(ModPayload {
                    arg: Some(json!("alt")),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..ResultItem::new("item").with_arg("default")
        };

        registry.execute_item("open", &item, true, true);
        registry.execute_item("open", &item, false, true);
        registry.execute_item("open", &item, false, false);

        let calls = record.lock().unwrap();
        let args: Vec<&Value> = calls.iter().map(|(_, a)| a).collect();
        assert_eq!(args, vec![&json!("super"), &json!("alt"), &json!("default")]);
    }

    #[test]
    fn copy_prefers_text_override() {
        let (registry, record) = recording_registry();
        let item: ResultItem = serde_json::from_value(json!({
            "title": "t", "arg": "the-arg", "text": { "copy": "override" }
        }))
        .unwrap();

        registry.copy_item(&item);
        let calls = record.lock().unwrap();
        assert_eq!(calls[0], (COPY_ACTION.to_string(), json!("override")));
    }

    #[test]
    fn copy_without_payload_is_a_no_op() {
        let (registry, record) = recording_registry();
        registry.copy_item(&ResultItem::new("bare"));
        assert!(record.lock().unwrap().is_empty());
    }
}
