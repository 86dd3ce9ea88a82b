use std::collections::BTreeMap;

use crate::sql::types::{DataType, Value};

/// Abstract Syntax Tree (AST) node definitions for SQL statements
#[derive(Debug, PartialEq)]
pub enum Statement {
    /// CREATE TABLE statement
    CreateTable {
        name: String,
        columns: Vec<Column>,
    },
    /// CREATE INDEX statement
    CreateIndex {
        name: String,
        table_name: String,
        columns: Vec<String>,
    },
    /// DROP TABLE statement
    DropTable {
        name: String,
    },
    /// INSERT statement
    Insert {
        table_name: String,
        columns: Option<Vec<String>>,
        values: Vec<Value>,
    },
    /// SELECT statement
    Select {
        /// Requested column names; empty means `*`
        select: Vec<String>,
        from: FromItem,
        where_clause: Option<Expression>,
        order_by: Vec<String>,
    },
    /// UPDATE statement
    Update {
        table_name: String,
        columns: BTreeMap<String, Value>,
        where_clause: Option<Expression>,
    },
    /// DELETE statement
    Delete {
        table_name: String,
        where_clause: Option<Expression>,
    },
    Begin,
    Commit,
    Rollback,
}

/// FROM clause item - represents a table or join expression
#[derive(Debug, PartialEq)]
pub enum FromItem {
    /// Single table reference
    Table {
        name: String,
    },

    /// Join expression, left-deep: `a JOIN b JOIN c` is `(a JOIN b) JOIN c`
    Join {
        left: Box<FromItem>,
        right: Box<FromItem>,
        /// Join ON condition, if one was written
        predicate: Option<Expression>,
    },
}

/// Column definition for CREATE TABLE statements
#[derive(Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub nullable: Option<bool>,
    pub default: Option<Value>,
    pub primary_key: bool,
    pub unique: bool,
}

/// Expression types (column refs, constants, operations)
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// Column reference, possibly `table.column`
    Field(String),
    /// Constant value
    Consts(Value),
    /// Logical or comparison operation
    Operation(Operation),
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Self::Consts(value)
    }
}

impl From<Operation> for Expression {
    fn from(value: Operation) -> Self {
        Self::Operation(value)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    LessThan(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    LessThanOrEqual(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    /// `%` matches any run of characters; anchored at the start only
    Like(Box<Expression>, Box<Expression>),
    IsNull(Box<Expression>),
    IsNotNull(Box<Expression>),
}
