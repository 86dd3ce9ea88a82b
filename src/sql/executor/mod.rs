use crate::{
    error::Result,
    sql::{
        engine::Catalog,
        executor::{
            join::NestedLoopJoin,
            mutation::{Delete, Insert, Update},
            query::{Filter, Order, Projection, Scan},
            schema::{CreateIndex, CreateTable, DropTable},
        },
        plan::Node,
        types::{Row, Value},
    },
    storage::Store,
};

mod constraint;
mod join;
mod mutation;
mod predicate;
mod query;
mod schema;

pub use predicate::Predicate;

/// SQL executor trait
pub trait Executor<S: Store> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet>;
}

/// Builds an executor from a plan node
///
/// The `'static` bound is required for trait object usage in recursive executor building.
impl<S: Store + 'static> dyn Executor<S> {
    pub fn build(node: Node) -> Box<dyn Executor<S>> {
        match node {
            Node::CreateTable { schema } => CreateTable::new(schema),
            Node::CreateIndex {
                name,
                table_name,
                columns,
            } => CreateIndex::new(name, table_name, columns),
            Node::DropTable { name } => DropTable::new(name),
            Node::Insert {
                table_name,
                columns,
                values,
            } => Insert::new(table_name, columns, values),
            Node::Update {
                table_name,
                columns,
                filter,
            } => Update::new(table_name, columns, filter),
            Node::Delete { table_name, filter } => Delete::new(table_name, filter),
            Node::Scan { table_name } => Scan::new(table_name),
            Node::NestedLoopJoin {
                left,
                right_table,
                predicate,
            } => NestedLoopJoin::new(Self::build(*left), right_table, predicate),
            Node::Filter { source, predicate } => Filter::new(Self::build(*source), predicate),
            Node::Order { source, order_by } => Order::new(Self::build(*source), order_by),
            Node::Projection {
                source,
                base_table,
                columns,
            } => Projection::new(Self::build(*source), base_table, columns),
        }
    }
}

/// Execution result set
#[derive(Debug, PartialEq)]
pub enum ResultSet {
    CreateTable { table_name: String, columns: usize },
    CreateIndex { index_name: String, table_name: String },
    DropTable { table_name: String },
    /// `row_id` is the 1-based position of the new row
    Insert { row_id: usize },
    Scan { columns: Vec<String>, rows: Vec<Row> },
    Update { count: usize },
    Delete { count: usize },
    Begin,
    Commit { operations: usize },
    Rollback,
}

impl ResultSet {
    /// Human-readable status line; None for query results
    pub fn status(&self) -> Option<String> {
        Some(match self {
            ResultSet::CreateTable { table_name, .. } => {
                format!("Table '{}' created successfully", table_name)
            }
            ResultSet::CreateIndex { index_name, table_name } => {
                format!("Index '{}' created on '{}'", index_name, table_name)
            }
            ResultSet::DropTable { table_name } => {
                format!("Table '{}' dropped successfully", table_name)
            }
            ResultSet::Insert { .. } => "Row inserted successfully".to_string(),
            ResultSet::Scan { .. } => return None,
            ResultSet::Update { count } => format!("{} row(s) updated", count),
            ResultSet::Delete { count } => format!("{} row(s) deleted", count),
            ResultSet::Begin => "Transaction started".to_string(),
            ResultSet::Commit { .. } => "Transaction committed".to_string(),
            ResultSet::Rollback => "Transaction rolled back".to_string(),
        })
    }

    /// Renders the result as a sequence of records: the data rows of a
    /// query, or a single status record with its counters.
    pub fn to_records(&self) -> Vec<Row> {
        if let ResultSet::Scan { rows, .. } = self {
            return rows.clone();
        }
        let mut record = Row::new();
        if let Some(status) = self.status() {
            record.insert("status".to_string(), Value::Text(status));
        }
        let counter = match self {
            ResultSet::CreateTable { columns, .. } => Some(("columns", *columns)),
            ResultSet::Insert { row_id } => Some(("row_id", *row_id)),
            ResultSet::Commit { operations } => Some(("operations", *operations)),
            _ => None,
        };
        if let Some((name, count)) = counter {
            record.insert(name.to_string(), Value::Integer(count as i64));
        }
        vec![record]
    }
}

#[cfg(test)]
mod tests {
    use super::ResultSet;
    use crate::sql::types::Value;

    #[test]
    fn test_status_records() {
        let records = ResultSet::Commit { operations: 3 }.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["status"], Value::Text("Transaction committed".to_string()));
        assert_eq!(records[0]["operations"], Value::Integer(3));

        let records = ResultSet::Update { count: 0 }.to_records();
        assert_eq!(records[0].len(), 1);
        assert_eq!(records[0]["status"], Value::Text("0 row(s) updated".to_string()));

        let scan = ResultSet::Scan { columns: vec!["a".to_string()], rows: vec![] };
        assert!(scan.status().is_none());
        assert!(scan.to_records().is_empty());
    }
}
