use crate::types::SqlValue;

/// Ordered column-to-value mapping supplied as input to insert and update.
/// Key order is the column order used in the generated statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<(String, SqlValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder form of [`FieldSet::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column value. An existing column keeps its position.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FieldSet::new();
        for (column, value) in iter {
            fields.set(column, value);
        }
        fields
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let fields = FieldSet::new().with("b", 2).with("a", 1).with("c", 3);
        assert_eq!(fields.columns().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut fields = FieldSet::new().with("a", 1).with("b", 2);
        fields.set("a", "changed");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(fields.get("a"), Some(&SqlValue::Text("changed".to_string())));
    }

    #[test]
    fn test_from_iterator() {
        let fields: FieldSet = [("first_name", "John"), ("last_name", "Doe")]
            .into_iter()
            .collect();
        assert!(fields.contains("last_name"));
        assert!(!fields.contains("id"));
        assert_eq!(fields.len(), 2);
    }
}
