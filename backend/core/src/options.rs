//! The options mapping handed to a command.
//!
//! Named values are keyed by option name; unnamed arguments left over after
//! flag parsing are kept in order in the positional list (serialized as `_`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(rename = "_", default, skip_serializing_if = "Vec::is_empty")]
    positional: Vec<Value>,
    #[serde(flatten)]
    named: BTreeMap<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.named.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    /// The value of `key` rendered as text (numbers and booleans included).
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.named.get(key).map(value_to_string)
    }

    /// Boolean view of `key`; accepts real booleans and the strings `true`/`false`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.named.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.named.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.named.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.named.iter()
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty()
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn push_positional(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Remove and return the first residual positional argument.
    pub fn take_positional(&mut self) -> Option<Value> {
        if self.positional.is_empty() {
            None
        } else {
            Some(self.positional.remove(0))
        }
    }

    /// Overlay `overrides` on top of `self`. Named values from `overrides`
    /// win; its positional list replaces ours only when it is non-empty.
    pub fn merge(mut self, overrides: Options) -> Options {
        self.named.extend(overrides.named);
        if !overrides.positional.is_empty() {
            self.positional = overrides.positional;
        }
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

/// Render an option value as plain text: strings unquoted, everything else
/// in its JSON form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
