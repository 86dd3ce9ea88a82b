use std::collections::BTreeMap;

use log::info;

use crate::{
    error::{Error, Result},
    sql::schema::Table,
    storage::Store,
};

/// The set of live tables, backed by a snapshot store.
///
/// Every structural mutation is followed by `snapshot`, which rewrites the
/// whole table. `restore` throws away in-memory state and reloads from the
/// store; that reload is the only undo mechanism there is. Because each
/// statement snapshots as it runs, a rollback cannot undo statements that
/// already completed inside the transaction.
pub struct Catalog<S: Store> {
    store: S,
    tables: BTreeMap<String, Table>,
}

impl<S: Store> Catalog<S> {
    /// Opens a catalog over `store`, loading every persisted table
    pub fn open(store: S) -> Result<Self> {
        let mut catalog = Self {
            store,
            tables: BTreeMap::new(),
        };
        catalog.restore()?;
        Ok(catalog)
    }

    /// Discards all in-memory tables and reloads the last snapshots.
    /// If any snapshot fails to load, the current tables are kept.
    pub fn restore(&mut self) -> Result<()> {
        let mut tables = BTreeMap::new();
        for name in self.store.names()? {
            if let Some(bytes) = self.store.get(&name)? {
                let table: Table = bincode::deserialize(&bytes)?;
                info!("loaded table {} ({} rows)", table.name, table.rows.len());
                tables.insert(name, table);
            }
        }
        self.tables = tables;
        Ok(())
    }

    /// Persists the current state of one table
    pub fn snapshot(&mut self, table_name: &str) -> Result<()> {
        let table = self.must_get_table(table_name)?;
        let bytes = bincode::serialize(table)?;
        self.store.set(table_name, bytes)
    }

    pub fn create_table(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(&table.name) {
            return Err(Error::Schema(format!("Table '{}' already exists", table.name)));
        }
        let name = table.name.clone();
        self.tables.insert(name.clone(), table);
        self.snapshot(&name)
    }

    pub fn drop_table(&mut self, table_name: &str) -> Result<Table> {
        let table = self
            .tables
            .remove(table_name)
            .ok_or(Error::Schema(format!("Table '{}' does not exist", table_name)))?;
        self.store.delete(table_name)?;
        Ok(table)
    }

    pub fn get_table(&self, table_name: &str) -> Option<&Table> {
        self.tables.get(table_name)
    }

    /// Returns table info, returns error if table doesn't exist
    pub fn must_get_table(&self, table_name: &str) -> Result<&Table> {
        self.tables
            .get(table_name)
            .ok_or(Error::Schema(format!("Table '{}' does not exist", table_name)))
    }

    pub fn must_get_table_mut(&mut self, table_name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(table_name)
            .ok_or(Error::Schema(format!("Table '{}' does not exist", table_name)))
    }

    /// All tables, ordered by name
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}
