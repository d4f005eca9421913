use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Anything keyed by a string identifier.
pub trait Record {
    fn id(&self) -> &str;
}

/// A named record (e.g. a user) matched lexically against documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Short label used for fuzzy matching (a person's name).
    pub label: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl Record for Entity {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A free-text record (e.g. a transaction description).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl Record for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Insertion-ordered table with constant-time lookup by id.
///
/// Iteration yields rows in load order. Inserting a row whose id already
/// exists replaces the stored row but keeps its original position, so the
/// first occurrence of an id fixes where it sorts on ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable<T> {
    rows: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T> Default for RecordTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: Record> RecordTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a row, returning the row it replaced if the id was already present.
    pub fn insert(&mut self, row: T) -> Option<T> {
        match self.positions.get(row.id()) {
            Some(&pos) => Some(std::mem::replace(&mut self.rows[pos], row)),
            None => {
                self.positions.insert(row.id().to_string(), self.rows.len());
                self.rows.push(row);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|&pos| &self.rows[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Rows in load order.
    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }
}

impl<T: Record> FromIterator<T> for RecordTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut table = RecordTable::new();
        for row in iter {
            table.insert(row);
        }
        table
    }
}

impl<'a, T: Record> IntoIterator for &'a RecordTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let table: RecordTable<Entity> = vec![
            Entity::new("u3", "Carol"),
            Entity::new("u1", "Alice"),
            Entity::new("u2", "Bob"),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = table.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "u1", "u2"]);
    }

    #[test]
    fn duplicate_id_replaces_in_place() {
        let mut table = RecordTable::new();
        table.insert(Entity::new("u1", "Alice"));
        table.insert(Entity::new("u2", "Bob"));
        let replaced = table.insert(Entity::new("u1", "Alicia"));

        assert_eq!(replaced, Some(Entity::new("u1", "Alice")));
        assert_eq!(table.len(), 2);
        assert_eq!(table.as_slice()[0].label, "Alicia");
        assert_eq!(table.get("u1").map(|e| e.label.as_str()), Some("Alicia"));
    }

    #[test]
    fn lookup_missing_id() {
        let table: RecordTable<Document> =
            std::iter::once(Document::new("t1", "salary payment")).collect();
        assert!(table.get("t2").is_none());
        assert!(table.contains("t1"));
        assert!(!table.is_empty());
    }
}
