use log::info;

use crate::{
    error::Result,
    sql::{engine::Catalog, executor::{Executor, ResultSet}, schema::Table},
    storage::Store,
};

/// CREATE TABLE executor
pub struct CreateTable {
    schema: Table,
}

impl CreateTable {
    pub fn new(schema: Table) -> Box<Self> {
        Box::new(Self { schema })
    }
}

impl<S: Store> Executor<S> for CreateTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table_name = self.schema.name.clone();
        let columns = self.schema.columns.len();
        catalog.create_table(self.schema)?;
        info!("created table {} with {} columns", table_name, columns);
        Ok(ResultSet::CreateTable { table_name, columns })
    }
}

/// DROP TABLE executor
pub struct DropTable {
    name: String,
}

impl DropTable {
    pub fn new(name: String) -> Box<Self> {
        Box::new(Self { name })
    }
}

impl<S: Store> Executor<S> for DropTable {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.drop_table(&self.name)?;
        info!("dropped table {} ({} rows)", self.name, table.rows.len());
        Ok(ResultSet::DropTable { table_name: self.name })
    }
}

/// CREATE INDEX executor
pub struct CreateIndex {
    name: String,
    table_name: String,
    columns: Vec<String>,
}

impl CreateIndex {
    pub fn new(name: String, table_name: String, columns: Vec<String>) -> Box<Self> {
        Box::new(Self { name, table_name, columns })
    }
}

impl<S: Store> Executor<S> for CreateIndex {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.must_get_table_mut(&self.table_name)?;
        table.add_index(self.name.clone(), self.columns)?;
        catalog.snapshot(&self.table_name)?;
        info!("created index {} on {}", self.name, self.table_name);
        Ok(ResultSet::CreateIndex {
            index_name: self.name,
            table_name: self.table_name,
        })
    }
}
