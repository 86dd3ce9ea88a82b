use std::collections::BTreeMap;

use crate::{
    error::Result,
    sql::{
        engine::Catalog,
        executor::{Executor, ResultSet},
        parser::ast::{self, Expression},
        plan::planner::Planner,
        schema::Table,
        types::Value,
    },
    storage::Store,
};

mod planner;

/// Execution plan node
#[derive(Debug, PartialEq)]
pub enum Node {
    CreateTable {
        schema: Table,
    },
    CreateIndex {
        name: String,
        table_name: String,
        columns: Vec<String>,
    },
    DropTable {
        name: String,
    },
    Insert {
        table_name: String,
        columns: Vec<String>,
        values: Vec<Value>,
    },
    Update {
        table_name: String,
        columns: BTreeMap<String, Value>,
        filter: Option<Expression>,
    },
    Delete {
        table_name: String,
        filter: Option<Expression>,
    },
    Scan {
        table_name: String,
    },
    NestedLoopJoin {
        left: Box<Node>,
        right_table: String,
        predicate: Option<Expression>,
    },
    Filter {
        source: Box<Node>,
        predicate: Expression,
    },
    Order {
        source: Box<Node>,
        order_by: Vec<String>,
    },
    Projection {
        source: Box<Node>,
        /// First table of the FROM clause; `*` expands to its columns
        base_table: String,
        columns: Vec<String>,
    },
}

/// Execution plan (root node)
#[derive(Debug, PartialEq)]
pub struct Plan(pub Node);

impl Plan {
    /// Builds a plan from an AST statement
    pub fn build(stmt: ast::Statement) -> Result<Self> {
        Planner::new().build(stmt)
    }

    /// Executes the plan against the catalog
    pub fn execute<S: Store + 'static>(self, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        <dyn Executor<S>>::build(self.0).execute(catalog)
    }
}
