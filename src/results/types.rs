//! Result item definitions
//!
//! Items are produced by plugins and passed through the engine mostly
//! untouched: only `title` is interpreted (for scoring), everything else is
//! carried opaquely for the host to render or execute.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single candidate result produced by a plugin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultItem {
    /// Display title, also the scoring target
    pub title: String,
    /// Secondary display line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Default execution payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Value>,
    /// Modifier-keyed payload overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mods: Option<Mods>,
    /// Text overrides (clipboard copy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextOptions>,
    /// Path of the plugin that produced this item, used for detail lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_path: Option<String>,
    /// Plugin-defined fields passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultItem {
    /// Create a new item with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            arg: None,
            mods: None,
            text: None,
            plugin_path: None,
            extra: Map::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn with_plugin_path(mut self, path: impl Into<String>) -> Self {
        self.plugin_path = Some(path.into());
        self
    }

    /// Pick the execution payload by modifier priority: super-modifier
    /// argument, else alt-modifier argument, else the default argument.
    pub fn resolved_arg(&self, is_super_mod: bool, is_alt_mod: bool) -> Option<&Value> {
        if let Some(mods) = &self.mods {
            if is_super_mod {
                if let Some(arg) = mods.super_mod.as_ref().and_then(|m| m.arg.as_ref()) {
                    return Some(arg);
                }
            }
            if is_alt_mod {
                if let Some(arg) = mods.alt.as_ref().and_then(|m| m.arg.as_ref()) {
                    return Some(arg);
                }
            }
        }
        self.arg.as_ref()
    }

    /// Payload for the clipboard: `text.copy` override, else the default
    /// argument rendered as a string.
    pub fn copy_text(&self) -> Option<String> {
        if let Some(copy) = self.text.as_ref().and_then(|t| t.copy.as_ref()) {
            return Some(copy.clone());
        }
        self.arg.as_ref().map(|arg| match arg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Structural identity of this item: canonical JSON with object keys
    /// sorted recursively, so two payloads that differ only in field order
    /// yield the same cache key.
    pub fn identity(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        canonicalize(&value).to_string()
    }
}

/// Modifier-keyed payload overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Mods {
    /// Payload when the super (cmd/win) modifier is held
    #[serde(
        rename = "super",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub super_mod: Option<ModPayload>,
    /// Payload when the alt modifier is held
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<ModPayload>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single modifier override
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text overrides for an item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextOptions {
    /// Clipboard override payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rewrite a JSON value with all object keys sorted recursively
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().map(|(k, v)| (k.clone(), v)).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
