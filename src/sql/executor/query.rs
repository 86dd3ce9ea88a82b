use std::cmp::Ordering;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Catalog,
        executor::{predicate::Predicate, ResultSet},
        parser::ast::Expression,
        types::{Row, Value},
    },
    storage::Store,
};

use super::Executor;

/// Table scan executor - copies every row of one table
pub struct Scan {
    table_name: String,
}

impl Scan {
    pub fn new(table_name: String) -> Box<Self> {
        Box::new(Self { table_name })
    }
}

impl<S: Store> Executor<S> for Scan {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.must_get_table(&self.table_name)?;
        Ok(ResultSet::Scan {
            columns: table.column_names(),
            rows: table.rows.clone(),
        })
    }
}

/// WHERE executor - keeps the rows satisfying the predicate
pub struct Filter<S: Store> {
    source: Box<dyn Executor<S>>,
    predicate: Expression,
}

impl<S: Store> Filter<S> {
    pub fn new(source: Box<dyn Executor<S>>, predicate: Expression) -> Box<Self> {
        Box::new(Self { source, predicate })
    }
}

impl<S: Store> Executor<S> for Filter<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        match self.source.execute(catalog)? {
            ResultSet::Scan { columns, rows } => {
                let predicate = Predicate::new(&self.predicate)?;
                let mut new_rows = Vec::new();
                for row in rows {
                    if predicate.evaluate(&row)? {
                        new_rows.push(row);
                    }
                }
                Ok(ResultSet::Scan { columns, rows: new_rows })
            }
            _ => Err(Error::Internal("Unexpected result set".into())),
        }
    }
}

/// ORDER BY executor - stable ascending sort on the listed columns
pub struct Order<S: Store> {
    source: Box<dyn Executor<S>>,
    order_by: Vec<String>,
}

impl<S: Store> Order<S> {
    pub fn new(source: Box<dyn Executor<S>>, order_by: Vec<String>) -> Box<Self> {
        Box::new(Self { source, order_by })
    }
}

impl<S: Store> Executor<S> for Order<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        match self.source.execute(catalog)? {
            ResultSet::Scan { columns, mut rows } => {
                // A missing key sorts as empty text
                let empty = Value::Text(String::new());
                rows.sort_by(|row1, row2| {
                    for col in &self.order_by {
                        let x = row1.get(col).unwrap_or(&empty);
                        let y = row2.get(col).unwrap_or(&empty);
                        match x.sort_cmp(y) {
                            Ordering::Equal => {}
                            o => return o,
                        }
                    }
                    Ordering::Equal
                });

                Ok(ResultSet::Scan { columns, rows })
            }
            _ => Err(Error::Internal("Unexpected result set".into())),
        }
    }
}

/// Projection executor - keeps the requested columns
///
/// With no explicit columns (`SELECT *`) the base table's declared columns
/// are used. Requested names absent from a row are left out of it.
pub struct Projection<S: Store> {
    source: Box<dyn Executor<S>>,
    base_table: String,
    columns: Vec<String>,
}

impl<S: Store> Projection<S> {
    pub fn new(source: Box<dyn Executor<S>>, base_table: String, columns: Vec<String>) -> Box<Self> {
        Box::new(Self { source, base_table, columns })
    }
}

impl<S: Store> Executor<S> for Projection<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let ResultSet::Scan { rows, .. } = self.source.execute(catalog)? else {
            return Err(Error::Internal("Unexpected result set".into()));
        };
        let columns = if self.columns.is_empty() {
            catalog.must_get_table(&self.base_table)?.column_names()
        } else {
            self.columns
        };

        let rows = rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
                    .collect::<Row>()
            })
            .collect();
        Ok(ResultSet::Scan { columns, rows })
    }
}
