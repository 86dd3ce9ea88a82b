use log::debug;

use crate::{
    config::Config,
    error::Result,
    sql::{
        executor::ResultSet,
        parser::{ast::Statement, Parser},
        plan::Plan,
        schema::Table,
    },
    storage::{FileStore, Store},
};

mod catalog;
mod transaction;

pub use catalog::Catalog;
pub use transaction::{TransactionManager, TransactionState};

/// The single entry point of the engine: owns the catalog and the
/// transaction state, and executes one statement at a time.
pub struct Database<S: Store> {
    catalog: Catalog<S>,
    txn: TransactionManager,
}

impl Database<FileStore> {
    /// Opens the database stored under `config.data_dir`
    pub fn open(config: &Config) -> Result<Self> {
        Self::new(FileStore::new(&config.data_dir)?)
    }
}

impl<S: Store + 'static> Database<S> {
    pub fn new(store: S) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::open(store)?,
            txn: TransactionManager::new(),
        })
    }

    /// Executes a SQL statement
    pub fn execute(&mut self, sql: &str) -> Result<ResultSet> {
        let text = normalize(sql);
        debug!("executing: {}", text);

        match Parser::new(sql).parse() {
            Ok(Statement::Begin) => {
                self.txn.begin();
                Ok(ResultSet::Begin)
            }
            Ok(Statement::Commit) => Ok(ResultSet::Commit {
                operations: self.txn.commit(),
            }),
            Ok(Statement::Rollback) => {
                self.txn.rollback();
                self.catalog.restore()?;
                Ok(ResultSet::Rollback)
            }
            // Logged before it runs, so statements that fail are logged too
            parsed => {
                self.txn.record(&text);
                Plan::build(parsed?)?.execute(&mut self.catalog)
            }
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.catalog.tables()
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.catalog.get_table(name)
    }

    pub fn in_transaction(&self) -> bool {
        self.txn.is_open()
    }

    /// Statements executed in the open transaction
    pub fn transaction_log(&self) -> &[String] {
        self.txn.log()
    }
}

// Line breaks and tabs become spaces, as the transaction log stores one
// statement per line.
fn normalize(sql: &str) -> String {
    sql.replace(['\n', '\r', '\t'], " ").trim().to_string()
}
