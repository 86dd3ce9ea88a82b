use crate::{
    error::{Error, Result},
    sql::{
        schema::{Column, Table},
        types::{Row, Value},
    },
};

/// Checks a candidate row before it is admitted to `table`.
///
/// `exclude` names the position of the row being replaced, which is left
/// out of the uniqueness scan.
pub fn validate_row(table: &Table, row: &Row, exclude: Option<usize>) -> Result<()> {
    for name in row.keys() {
        table.get_column(name)?;
    }
    for col in &table.columns {
        validate_value(table, col, row.get(&col.name), exclude)?;
    }
    Ok(())
}

/// Checks one column's value: nullability, declared type, then uniqueness
pub fn validate_value(
    table: &Table,
    col: &Column,
    value: Option<&Value>,
    exclude: Option<usize>,
) -> Result<()> {
    let value = match value {
        None | Some(Value::Null) if !col.nullable => {
            return Err(Error::Constraint(format!("Column '{}' cannot be NULL", col.name)));
        }
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };

    if !col.datatype.accepts(value) {
        return Err(Error::Constraint(format!(
            "Column '{}' expects {}, got {}",
            col.name,
            col.datatype,
            value.datatype().map_or("NULL".to_string(), |dt| dt.to_string())
        )));
    }

    if col.unique {
        let duplicate = table
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude)
            .any(|(_, existing)| existing.get(&col.name).is_some_and(|v| v.loose_eq(value)));
        if duplicate {
            return Err(Error::Constraint(format!(
                "Duplicate value for unique column '{}'",
                col.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_row;
    use crate::{
        error::{Error, Result},
        sql::{
            schema::{Column, Table},
            types::{DataType, Row, Value},
        },
    };

    fn table() -> Result<Table> {
        let mut table = Table::new(
            "t".to_string(),
            vec![
                Column {
                    name: "id".to_string(),
                    datatype: DataType::Integer,
                    nullable: false,
                    default: None,
                    primary_key: true,
                    unique: true,
                },
                Column {
                    name: "score".to_string(),
                    datatype: DataType::Real,
                    nullable: true,
                    default: None,
                    primary_key: false,
                    unique: false,
                },
                Column {
                    name: "done".to_string(),
                    datatype: DataType::Boolean,
                    nullable: true,
                    default: None,
                    primary_key: false,
                    unique: false,
                },
            ],
        )?;
        table.append_row(row(&[("id", Value::Integer(1))]));
        Ok(table)
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_valid_rows() -> Result<()> {
        let table = table()?;
        validate_row(&table, &row(&[("id", Value::Integer(2))]), None)?;
        validate_row(&table, &row(&[("id", Value::Integer(2)), ("score", Value::Integer(4))]), None)?;
        validate_row(&table, &row(&[("id", Value::Integer(2)), ("done", Value::Null)]), None)?;
        // the row being replaced may keep its own key
        validate_row(&table, &row(&[("id", Value::Integer(1))]), Some(0))?;
        Ok(())
    }

    #[test]
    fn test_violations() -> Result<()> {
        let table = table()?;
        let cases = [
            row(&[("score", Value::Real(1.0))]),
            row(&[("id", Value::Null)]),
            row(&[("id", Value::Real(2.5))]),
            row(&[("id", Value::Integer(2)), ("done", Value::Integer(1))]),
            row(&[("id", Value::Integer(1))]),
        ];
        for case in cases {
            assert!(matches!(validate_row(&table, &case, None), Err(Error::Constraint(_))));
        }
        assert!(matches!(
            validate_row(&table, &row(&[("id", Value::Integer(2)), ("nope", Value::Null)]), None),
            Err(Error::Schema(_))
        ));
        Ok(())
    }
}
