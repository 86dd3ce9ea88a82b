use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sql::{
        index::Index,
        types::{DataType, Row, Value},
    },
};

/// Name of the index maintained over the primary key column
pub const PRIMARY_INDEX: &str = "__primary";

/// A table: its schema together with the rows and indexes it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub indexes: BTreeMap<String, Index>,
    /// Monotonic counter, reserved; row identity is the position
    pub next_row_id: u64,
}

impl Table {
    /// Creates an empty table with its primary and unique indexes
    pub fn new(name: String, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self {
            name,
            columns,
            rows: Vec::new(),
            indexes: BTreeMap::new(),
            next_row_id: 1,
        };
        table.validate()?;
        table.create_default_indexes();
        Ok(table)
    }

    /// Validates table schema
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::Syntax(format!("table {} has no columns", self.name)));
        }

        if self.columns.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(Error::Schema(format!(
                "Multiple primary keys for table {}",
                self.name
            )));
        }

        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(Error::Schema(format!(
                    "Duplicate column {} in table {}",
                    col.name, self.name
                )));
            }
            if let Some(default) = &col.default {
                if !col.datatype.accepts(default) {
                    return Err(Error::Schema(format!(
                        "Default for column {} is not a valid {}",
                        col.name, col.datatype
                    )));
                }
            }
        }

        Ok(())
    }

    fn create_default_indexes(&mut self) {
        let mut indexes = Vec::new();
        if let Some(pk) = self.primary_key() {
            indexes.push((PRIMARY_INDEX.to_string(), pk.name.clone()));
        }
        for col in self.columns.iter().filter(|c| c.unique && !c.primary_key) {
            indexes.push((format!("__unique_{}", col.name), col.name.clone()));
        }
        for (name, column) in indexes {
            self.indexes.insert(name, Index::new(vec![column]));
        }
    }

    /// Returns the primary key column, if the table declares one
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Looks up a column by name
    pub fn get_column(&self, col_name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == col_name)
            .ok_or(Error::Schema(format!(
                "Column '{}' does not exist in table '{}'",
                col_name, self.name
            )))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Registers a new index and backfills it from the current rows
    pub fn add_index(&mut self, name: String, columns: Vec<String>) -> Result<()> {
        if self.indexes.contains_key(&name) {
            return Err(Error::Schema(format!(
                "Index '{}' already exists on '{}'",
                name, self.name
            )));
        }
        for col in &columns {
            self.get_column(col)?;
        }
        let mut index = Index::new(columns);
        index.rebuild(&self.rows);
        self.indexes.insert(name, index);
        Ok(())
    }

    /// Appends a row that already passed validation and indexes it
    pub fn append_row(&mut self, row: Row) -> usize {
        let position = self.rows.len();
        for index in self.indexes.values_mut() {
            index.insert(&row, position);
        }
        self.rows.push(row);
        self.next_row_id += 1;
        position
    }

    pub fn rebuild_indexes(&mut self) {
        for index in self.indexes.values_mut() {
            index.rebuild(&self.rows);
        }
    }
}

/// Column schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub nullable: bool,
    pub default: Option<Value>,
    /// Whether this column is the primary key
    pub primary_key: bool,
    /// Implied by primary_key
    pub unique: bool,
}

#[cfg(test)]
mod tests {
    use super::{Column, Table, PRIMARY_INDEX};
    use crate::{
        error::{Error, Result},
        sql::types::{DataType, Row, Value},
    };

    fn column(name: &str, primary_key: bool, unique: bool) -> Column {
        Column {
            name: name.to_string(),
            datatype: DataType::Integer,
            nullable: !primary_key,
            default: None,
            primary_key,
            unique: unique || primary_key,
        }
    }

    #[test]
    fn test_default_indexes() -> Result<()> {
        let table = Table::new(
            "t".into(),
            vec![column("id", true, false), column("code", false, true), column("n", false, false)],
        )?;
        assert!(table.indexes.contains_key(PRIMARY_INDEX));
        assert!(table.indexes.contains_key("__unique_code"));
        assert_eq!(table.indexes.len(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_schemas() {
        let two_pks = Table::new("t".into(), vec![column("a", true, false), column("b", true, false)]);
        assert!(matches!(two_pks, Err(Error::Schema(_))));

        let dup = Table::new("t".into(), vec![column("a", false, false), column("a", false, false)]);
        assert!(matches!(dup, Err(Error::Schema(_))));

        assert!(matches!(Table::new("t".into(), vec![]), Err(Error::Syntax(_))));
    }

    #[test]
    fn test_add_index_backfills() -> Result<()> {
        let mut table = Table::new("t".into(), vec![column("id", true, false), column("n", false, false)])?;
        for i in 0..3 {
            let row: Row = [("id".to_string(), Value::Integer(i)), ("n".to_string(), Value::Integer(i % 2))]
                .into_iter()
                .collect();
            table.append_row(row);
        }
        table.add_index("by_n".into(), vec!["n".into()])?;
        assert_eq!(table.indexes["by_n"].lookup(&[Value::Integer(0)]), &[0, 2]);

        assert!(matches!(
            table.add_index("by_n".into(), vec!["n".into()]),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            table.add_index("bad".into(), vec!["missing".into()]),
            Err(Error::Schema(_))
        ));
        Ok(())
    }
}
