use std::{cmp::Ordering, collections::HashMap};

use regex::Regex;

use crate::{
    error::{Error, Result},
    sql::{
        parser::ast::{Expression, Operation},
        types::{Row, Value},
    },
};

/// A WHERE predicate ready to be evaluated against many rows.
///
/// LIKE patterns are compiled once, when the predicate is built.
/// Columns missing from a row read as NULL. Ordering comparisons against
/// NULL or between incompatible kinds are false rather than errors.
#[derive(Debug)]
pub struct Predicate<'a> {
    expr: &'a Expression,
    patterns: HashMap<String, Regex>,
}

impl<'a> Predicate<'a> {
    pub fn new(expr: &'a Expression) -> Result<Self> {
        let mut patterns = HashMap::new();
        compile_patterns(expr, &mut patterns)?;
        Ok(Self { expr, patterns })
    }

    pub fn evaluate(&self, row: &Row) -> Result<bool> {
        self.eval(self.expr, row)
    }

    fn eval(&self, expr: &Expression, row: &Row) -> Result<bool> {
        Ok(match expr {
            Expression::Operation(op) => match op {
                Operation::And(lhs, rhs) => self.eval(lhs, row)? && self.eval(rhs, row)?,
                Operation::Or(lhs, rhs) => self.eval(lhs, row)? || self.eval(rhs, row)?,
                Operation::Equal(lhs, rhs) => value(lhs, row).loose_eq(&value(rhs, row)),
                Operation::NotEqual(lhs, rhs) => !value(lhs, row).loose_eq(&value(rhs, row)),
                Operation::LessThan(lhs, rhs) => ordered(lhs, rhs, row, |o| o == Ordering::Less),
                Operation::GreaterThan(lhs, rhs) => {
                    ordered(lhs, rhs, row, |o| o == Ordering::Greater)
                }
                Operation::LessThanOrEqual(lhs, rhs) => {
                    ordered(lhs, rhs, row, |o| o != Ordering::Greater)
                }
                Operation::GreaterThanOrEqual(lhs, rhs) => {
                    ordered(lhs, rhs, row, |o| o != Ordering::Less)
                }
                Operation::Like(lhs, rhs) => {
                    let text = match value(lhs, row) {
                        Value::Null => String::new(),
                        v => v.to_string(),
                    };
                    let pattern = value(rhs, row).to_string();
                    match self.patterns.get(&pattern) {
                        Some(re) => re.is_match(&text),
                        None => like_regex(&pattern)?.is_match(&text),
                    }
                }
                Operation::IsNull(expr) => value(expr, row).is_null(),
                Operation::IsNotNull(expr) => !value(expr, row).is_null(),
            },
            Expression::Field(_) | Expression::Consts(_) => {
                return Err(Error::Syntax(format!("{:?} is not a predicate", expr)));
            }
        })
    }
}

fn compile_patterns(expr: &Expression, patterns: &mut HashMap<String, Regex>) -> Result<()> {
    let Expression::Operation(op) = expr else {
        return Ok(());
    };
    match op {
        Operation::And(lhs, rhs) | Operation::Or(lhs, rhs) => {
            compile_patterns(lhs, patterns)?;
            compile_patterns(rhs, patterns)
        }
        Operation::Like(_, rhs) => {
            if let Expression::Consts(pattern) = rhs.as_ref() {
                let pattern = pattern.to_string();
                if !patterns.contains_key(&pattern) {
                    let re = like_regex(&pattern)?;
                    patterns.insert(pattern, re);
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn value(expr: &Expression, row: &Row) -> Value {
    match expr {
        Expression::Field(name) => row.get(name).cloned().unwrap_or(Value::Null),
        Expression::Consts(value) => value.clone(),
        Expression::Operation(_) => Value::Null,
    }
}

fn ordered<F: Fn(Ordering) -> bool>(lhs: &Expression, rhs: &Expression, row: &Row, check: F) -> bool {
    value(lhs, row).compare(&value(rhs, row)).is_some_and(check)
}

/// `%` matches any run of characters. The pattern is anchored at the start
/// of the text but not at the end, so `ab` matches `abc`.
fn like_regex(pattern: &str) -> Result<Regex> {
    let pattern = pattern
        .split('%')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^(?s:{})", pattern)).map_err(|e| Error::Internal(e.to_string()))
}
