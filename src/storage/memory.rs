use std::collections::BTreeMap;

use crate::{error::Result, storage::engine::Store};

/// In-memory snapshot store
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { data: BTreeMap::new() }
    }
}

impl Store for MemoryStore {
    fn set(&mut self, name: &str, snapshot: Vec<u8>) -> Result<()> {
        self.data.insert(name.to_string(), snapshot);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(name).cloned())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.data.remove(name);
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.data.keys().cloned().collect())
    }
}
