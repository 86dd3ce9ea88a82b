use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sql::types::{Row, Value};

/// Tuple of a row's values for an index's key columns
pub type IndexKey = Vec<Value>;

/// Hash index from a composite key to the positions of the rows holding it.
///
/// Positions are row offsets in the owning table, so any update or delete
/// invalidates them and the index must be rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub columns: Vec<String>,
    pub entries: HashMap<IndexKey, Vec<usize>>,
}

impl Index {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, entries: HashMap::new() }
    }

    /// Builds the key for a row, or None when the row lacks one of the
    /// key columns. Such rows are left out of the index.
    pub fn key(&self, row: &Row) -> Option<IndexKey> {
        self.columns.iter().map(|c| row.get(c).cloned()).collect()
    }

    /// Records a newly appended row
    pub fn insert(&mut self, row: &Row, position: usize) {
        if let Some(key) = self.key(row) {
            self.entries.entry(key).or_default().push(position);
        }
    }

    /// Discards every entry and re-indexes all rows
    pub fn rebuild(&mut self, rows: &[Row]) {
        self.entries.clear();
        for (position, row) in rows.iter().enumerate() {
            self.insert(row, position);
        }
    }

    /// Row positions holding the given key
    pub fn lookup(&self, key: &[Value]) -> &[usize] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}
