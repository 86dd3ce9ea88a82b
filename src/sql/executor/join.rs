use log::debug;

use crate::{
    error::{Error, Result},
    sql::{engine::Catalog, parser::ast::Expression},
    storage::Store,
};

use super::{Executor, ResultSet};

/// Nested Loop Join executor - produces the Cartesian product of its input
/// and one more table.
///
/// The right table's keys are prefixed with `table.`. The ON condition is
/// carried but not applied: every pair of rows is emitted, and narrowing
/// the result is left to WHERE.
pub struct NestedLoopJoin<S: Store> {
    left: Box<dyn Executor<S>>,
    right_table: String,
    predicate: Option<Expression>,
}

impl<S: Store> NestedLoopJoin<S> {
    pub fn new(
        left: Box<dyn Executor<S>>,
        right_table: String,
        predicate: Option<Expression>,
    ) -> Box<Self> {
        Box::new(Self {
            left,
            right_table,
            predicate,
        })
    }
}

impl<S: Store> Executor<S> for NestedLoopJoin<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let ResultSet::Scan {
            columns: mut new_cols,
            rows: lrows,
        } = self.left.execute(catalog)?
        else {
            return Err(Error::Internal("Unexpected result set".into()));
        };

        let right = catalog.must_get_table(&self.right_table)?;
        if let Some(predicate) = &self.predicate {
            debug!("join with {} ignores ON {:?}", self.right_table, predicate);
        }

        let qualify = |col: &str| format!("{}.{}", self.right_table, col);
        new_cols.extend(right.columns.iter().map(|c| qualify(&c.name)));

        let mut new_rows = Vec::with_capacity(lrows.len() * right.rows.len());
        for lrow in &lrows {
            for rrow in &right.rows {
                let mut row = lrow.clone();
                row.extend(rrow.iter().map(|(k, v)| (qualify(k), v.clone())));
                new_rows.push(row);
            }
        }

        Ok(ResultSet::Scan {
            columns: new_cols,
            rows: new_rows,
        })
    }
}
