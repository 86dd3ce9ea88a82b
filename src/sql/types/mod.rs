use std::{cmp::Ordering, collections::BTreeMap, fmt::Display, hash::{Hash, Hasher}};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported SQL data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Text,
    Real,
    Boolean,
    Date,
}

impl DataType {
    /// Parses a declared type name, accepting the common aliases
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(match name.to_uppercase().as_ref() {
            "INTEGER" | "INT" => DataType::Integer,
            "TEXT" | "VARCHAR" | "STRING" => DataType::Text,
            "REAL" | "FLOAT" | "DOUBLE" => DataType::Real,
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "DATE" => DataType::Date,
            other => return Err(Error::Syntax(format!("unknown data type {}", other))),
        })
    }

    /// Whether a non-null value may be stored in a column of this type.
    /// TEXT and DATE columns are not type-checked.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (DataType::Integer, v) => matches!(v, Value::Integer(_)),
            (DataType::Real, v) => matches!(v, Value::Integer(_) | Value::Real(_)),
            (DataType::Boolean, v) => matches!(v, Value::Boolean(_)),
            (DataType::Text, _) | (DataType::Date, _) => true,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
        })
    }
}

/// Runtime value of a single cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Infers a value from raw literal text.
    ///
    /// The order is fixed: integer, then real, then boolean, then NULL, and
    /// anything else stays text. So `5` is an integer and `5.0` a real.
    /// Only plain digits count as numbers: `-5` stays text.
    pub fn coerce(raw: &str) -> Value {
        if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(i) = raw.parse() {
                return Value::Integer(i);
            }
        }
        if is_decimal(raw) {
            if let Ok(f) = raw.parse() {
                return Value::Real(f);
            }
        }
        match raw.to_uppercase().as_ref() {
            "TRUE" => Value::Boolean(true),
            "FALSE" => Value::Boolean(false),
            _ if raw == "NULL" => Value::Null,
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Returns the data type of the value, or None if it's Null
    pub fn datatype(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(DataType::Boolean),
            Self::Integer(_) => Some(DataType::Integer),
            Self::Real(_) => Some(DataType::Real),
            Self::Text(_) => Some(DataType::Text),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Equality used by predicates and uniqueness checks: integers and
    /// reals compare numerically, NULL equals only NULL.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Real(b)) | (Value::Real(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (a, b) => a == b,
        }
    }

    /// Ordering between two non-null values of compatible kinds
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (a, b) => a.partial_cmp(b),
        }
    }

    /// Total order used for sorting; values of different kinds order by
    /// kind: NULL, booleans, numbers, then text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        self.partial_cmp(other).unwrap_or_else(|| self.rank().cmp(&other.rank()))
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Real(_) => 2,
            Value::Text(_) => 3,
        }
    }
}

/// Digits with exactly one dot, e.g. `5.0`, `.5` or `5.`
fn is_decimal(s: &str) -> bool {
    s.matches('.').count() == 1
        && s.len() > 1
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "{}", "NULL"),
            Value::Boolean(b) if *b => write!(f, "{}", "TRUE"),
            Value::Boolean(_) => write!(f, "{}", "FALSE"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Implements partial ordering for Value comparison (used by ORDER BY)
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) => Some(Ordering::Less),
            (_, Value::Null) => Some(Ordering::Greater),
            (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Real(b)) => (*a as f64).partial_cmp(b),
            (Value::Real(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (_, _) => None,
        }
    }
}

// Index keys need Eq + Hash. Reals hash by bit pattern with -0.0 folded into
// 0.0, which is consistent with the derived PartialEq for every value except NaN.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Real(f) => {
                let f = if *f == 0.0 { 0.0f64 } else { *f };
                f.to_bits().hash(state)
            }
            Value::Text(s) => s.hash(state),
        }
    }
}

/// A row maps column names to values. Joined rows also carry
/// `table.column` keys for the second and later tables.
pub type Row = BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::{DataType, Value};

    #[test]
    fn test_coerce_order() {
        assert_eq!(Value::coerce("5"), Value::Integer(5));
        assert_eq!(Value::coerce("-12"), Value::Text("-12".to_string()));
        assert_eq!(Value::coerce("5.0"), Value::Real(5.0));
        assert_eq!(Value::coerce(".5"), Value::Real(0.5));
        assert_eq!(Value::coerce("-0.5"), Value::Text("-0.5".to_string()));
        assert_eq!(Value::coerce("true"), Value::Boolean(true));
        assert_eq!(Value::coerce("FALSE"), Value::Boolean(false));
        assert_eq!(Value::coerce("NULL"), Value::Null);
        assert_eq!(Value::coerce("null"), Value::Text("null".to_string()));
        assert_eq!(Value::coerce("1.2.3"), Value::Text("1.2.3".to_string()));
        assert_eq!(Value::coerce("-"), Value::Text("-".to_string()));
        assert_eq!(Value::coerce("."), Value::Text(".".to_string()));
    }

    #[test]
    fn test_accepts() {
        assert!(DataType::Integer.accepts(&Value::Integer(1)));
        assert!(!DataType::Integer.accepts(&Value::Real(1.5)));
        assert!(!DataType::Integer.accepts(&Value::Boolean(true)));
        assert!(DataType::Real.accepts(&Value::Integer(1)));
        assert!(DataType::Real.accepts(&Value::Real(1.5)));
        assert!(!DataType::Boolean.accepts(&Value::Integer(1)));
        assert!(DataType::Text.accepts(&Value::Integer(1)));
        assert!(DataType::Boolean.accepts(&Value::Null));
    }

    #[test]
    fn test_loose_eq() {
        assert!(Value::Integer(1).loose_eq(&Value::Real(1.0)));
        assert!(Value::Null.loose_eq(&Value::Null));
        assert!(!Value::Null.loose_eq(&Value::Integer(0)));
        assert!(!Value::Text("1".into()).loose_eq(&Value::Integer(1)));
    }

    #[test]
    fn test_sort_cmp() {
        use std::cmp::Ordering;
        assert_eq!(Value::Integer(2).sort_cmp(&Value::Real(1.5)), Ordering::Greater);
        assert_eq!(Value::Text("".into()).sort_cmp(&Value::Integer(9)), Ordering::Greater);
        assert_eq!(Value::Null.sort_cmp(&Value::Boolean(false)), Ordering::Less);
        assert_eq!(Value::Text("a".into()).sort_cmp(&Value::Text("b".into())), Ordering::Less);
    }

    #[test]
    fn test_datatype_aliases() {
        assert_eq!(DataType::from_name("int").ok(), Some(DataType::Integer));
        assert_eq!(DataType::from_name("varchar").ok(), Some(DataType::Text));
        assert_eq!(DataType::from_name("double").ok(), Some(DataType::Real));
        assert_eq!(DataType::from_name("Date").ok(), Some(DataType::Date));
        assert!(DataType::from_name("blob").is_err());
    }
}
