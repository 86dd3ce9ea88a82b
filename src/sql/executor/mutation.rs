use std::collections::BTreeMap;

use log::debug;

use crate::{
    error::{Error, Result},
    sql::{
        engine::Catalog,
        executor::{
            constraint::{validate_row, validate_value},
            predicate::Predicate,
            ResultSet,
        },
        parser::ast::Expression,
        schema::Table,
        types::{Row, Value},
    },
    storage::Store,
};

use super::Executor;

/// INSERT executor
pub struct Insert {
    table_name: String,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Insert {
    pub fn new(table_name: String, columns: Vec<String>, values: Vec<Value>) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            values,
        })
    }
}

// Pairs columns with values positionally, then fills omitted columns from
// their defaults.
// tbl (a, b DEFAULT 0, c):
// insert into tbl(c, a) values(1, 2);
//    a     b     c
//    2     0     1
fn make_row(table: &Table, columns: &[String], values: Vec<Value>) -> Result<Row> {
    let columns = if columns.is_empty() {
        table.column_names()
    } else {
        columns.to_vec()
    };
    if columns.len() != values.len() {
        return Err(Error::Syntax(format!(
            "Column count ({}) doesn't match value count ({})",
            columns.len(),
            values.len()
        )));
    }

    let mut row: Row = columns.into_iter().zip(values).collect();
    for col in &table.columns {
        if let Some(default) = &col.default {
            row.entry(col.name.clone()).or_insert_with(|| default.clone());
        }
    }
    Ok(row)
}

impl<S: Store> Executor<S> for Insert {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.must_get_table_mut(&self.table_name)?;
        let row = make_row(table, &self.columns, self.values)?;
        validate_row(table, &row, None)?;

        let position = table.append_row(row);
        debug!("inserted row at position {} of {}", position, self.table_name);
        catalog.snapshot(&self.table_name)?;
        Ok(ResultSet::Insert { row_id: position + 1 })
    }
}

/// UPDATE executor
pub struct Update {
    table_name: String,
    columns: BTreeMap<String, Value>,
    filter: Option<Expression>,
}

impl Update {
    pub fn new(
        table_name: String,
        columns: BTreeMap<String, Value>,
        filter: Option<Expression>,
    ) -> Box<Self> {
        Box::new(Self {
            table_name,
            columns,
            filter,
        })
    }
}

impl<S: Store> Executor<S> for Update {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.must_get_table_mut(&self.table_name)?;
        let matched = matching_positions(table, self.filter.as_ref())?;

        // Every matched row is checked before any is written, so a
        // violation leaves the table untouched.
        for (name, value) in &self.columns {
            let col = table.get_column(name)?;
            if col.unique && !value.is_null() && matched.len() > 1 {
                return Err(Error::Constraint(format!(
                    "Duplicate value for unique column '{}'",
                    name
                )));
            }
            for &position in &matched {
                validate_value(table, col, Some(value), Some(position))?;
            }
        }

        for &position in &matched {
            table.rows[position].extend(self.columns.clone());
        }

        if !matched.is_empty() {
            table.rebuild_indexes();
            catalog.snapshot(&self.table_name)?;
        }
        debug!("updated {} rows in {}", matched.len(), self.table_name);
        Ok(ResultSet::Update { count: matched.len() })
    }
}

/// DELETE executor
pub struct Delete {
    table_name: String,
    filter: Option<Expression>,
}

impl Delete {
    pub fn new(table_name: String, filter: Option<Expression>) -> Box<Self> {
        Box::new(Self { table_name, filter })
    }
}

impl<S: Store> Executor<S> for Delete {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        let table = catalog.must_get_table_mut(&self.table_name)?;
        let matched = matching_positions(table, self.filter.as_ref())?;

        // Highest position first, so the earlier positions stay valid
        for &position in matched.iter().rev() {
            table.rows.remove(position);
        }

        if !matched.is_empty() {
            table.rebuild_indexes();
            catalog.snapshot(&self.table_name)?;
        }
        debug!("deleted {} rows from {}", matched.len(), self.table_name);
        Ok(ResultSet::Delete { count: matched.len() })
    }
}

/// Positions of the rows satisfying the filter, in ascending order
fn matching_positions(table: &Table, filter: Option<&Expression>) -> Result<Vec<usize>> {
    let predicate = filter.map(Predicate::new).transpose()?;
    let mut positions = Vec::new();
    for (position, row) in table.rows.iter().enumerate() {
        let matches = match &predicate {
            Some(predicate) => predicate.evaluate(row)?,
            None => true,
        };
        if matches {
            positions.push(position);
        }
    }
    Ok(positions)
}
