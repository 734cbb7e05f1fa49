use crate::stmt::Value;

use indexmap::{IndexMap, IndexSet};

/// Attribute values held by one resource, keyed by property name, along with
/// the set of properties assigned since the last save.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    values: IndexMap<String, Value>,
    dirty: IndexSet<String>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Assigns a value, marking the property dirty.
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
        self.dirty.insert(name.to_string());
    }

    /// Stores a value read from storage. Loaded values are not dirty.
    pub fn load(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
        self.dirty.shift_remove(name);
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn dirty(&self) -> impl Iterator<Item = &str> + '_ {
        self.dirty.iter().map(String::as_str)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
