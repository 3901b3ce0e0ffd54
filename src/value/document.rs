//! Ordered document representation

use serde_json::{Map, Value};

use super::TypedValue;

/// Ordered field name -> value mapping.
///
/// Field names are unique; inserting an existing name replaces the value in
/// place and keeps its position. Documents are small and built once per row,
/// so lookups are linear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    entries: Vec<(String, TypedValue)>,
}

impl Document {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Sets a field, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: TypedValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`Document::insert`]
    pub fn with(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<TypedValue> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypedValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Renders the document as extended JSON (keys come out in serde_json map order)
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.entries {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl FromIterator<(String, TypedValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (name, value) in iter {
            doc.insert(name, value);
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut doc = Document::new();
        doc.insert("a", TypedValue::SignedInt64(1));
        doc.insert("b", TypedValue::SignedInt64(2));
        doc.insert("a", TypedValue::SignedInt64(3));

        let names: Vec<&str> = doc.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(doc.get("a"), Some(&TypedValue::SignedInt64(3)));
    }

    #[test]
    fn test_missing_field() {
        let doc = Document::new().with("x", TypedValue::Null);
        assert!(doc.get("y").is_none());
        assert!(doc.contains_key("x"));
    }

    #[test]
    fn test_remove() {
        let mut doc = Document::new()
            .with("a", TypedValue::Bool(true))
            .with("b", TypedValue::Bool(false));
        assert_eq!(doc.remove("a"), Some(TypedValue::Bool(true)));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.remove("a"), None);
    }
}
