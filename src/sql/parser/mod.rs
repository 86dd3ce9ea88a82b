use std::collections::BTreeMap;
use std::iter::Peekable;
use ast::{Column, Expression, FromItem, Operation};
use crate::sql::parser::lexer::{Keyword, Lexer, Token};
use crate::error::{Result, Error};
use super::types::{DataType, Value};

pub mod ast;
mod lexer;

/// SQL Parser - Converts tokens into Abstract Syntax Tree (AST)
pub struct Parser<'a> {
    input: &'a str,
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given SQL input
    pub fn new(input: &'a str) -> Self {
        Parser { input, lexer: Lexer::new(input).peekable() }
    }

    /// Parses the input SQL statement into an AST
    pub fn parse(&mut self) -> Result<ast::Statement> {
        let stmt = self.parse_statement()?;
        self.next_if_token(Token::Semicolon);
        // No tokens allowed after the statement
        if let Some(token) = self.peek()? {
            return Err(Error::Syntax(format!("[Parser] Unexpected token {}", token)));
        }
        Ok(stmt)
    }

    /// Parses a statement based on its leading keyword
    fn parse_statement(&mut self) -> Result<ast::Statement> {
        match self.peek()? {
            Some(Token::Keyword(Keyword::Create)) => self.parse_ddl(),
            Some(Token::Keyword(Keyword::Insert)) => self.parse_insert(),
            Some(Token::Keyword(Keyword::Select)) => self.parse_select(),
            Some(Token::Keyword(Keyword::Update)) => self.parse_update(),
            Some(Token::Keyword(Keyword::Delete)) => self.parse_delete(),
            Some(Token::Keyword(Keyword::Drop)) => self.parse_drop(),
            Some(Token::Keyword(Keyword::Begin)) => self.parse_transaction(ast::Statement::Begin),
            Some(Token::Keyword(Keyword::Commit)) => self.parse_transaction(ast::Statement::Commit),
            Some(Token::Keyword(Keyword::Rollback)) => {
                self.parse_transaction(ast::Statement::Rollback)
            }
            Some(_) => Err(self.unsupported()),
            None => Err(Error::Syntax("[Parser] Empty statement".into())),
        }
    }

    fn unsupported(&self) -> Error {
        Error::Unsupported(self.input.trim().to_string())
    }

    /// Parses CREATE TABLE / CREATE INDEX
    fn parse_ddl(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Create))?;
        match self.next()? {
            Token::Keyword(Keyword::Table) => self.parse_ddl_create_table(),
            Token::Keyword(Keyword::Index) => self.parse_ddl_create_index(),
            _ => Err(self.unsupported()),
        }
    }

    /// Parses CREATE TABLE statement
    fn parse_ddl_create_table(&mut self) -> Result<ast::Statement> {
        let table_name = self.next_ident()?;
        self.next_expect(Token::OpenParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_ddl_column()?);
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }
        self.next_expect(Token::CloseParen)?;
        Ok(ast::Statement::CreateTable { name: table_name, columns })
    }

    /// Parses column definition in CREATE TABLE
    fn parse_ddl_column(&mut self) -> Result<ast::Column> {
        let name = self.next_ident()?;
        let datatype = DataType::from_name(&self.next_ident()?)?;
        // VARCHAR(255) and friends: the length is accepted and ignored
        if self.next_if_token(Token::OpenParen).is_some() {
            self.next_number()?;
            self.next_expect(Token::CloseParen)?;
        }
        let mut column = Column {
            name,
            datatype,
            nullable: None,
            default: None,
            primary_key: false,
            unique: false,
        };

        // Parse column constraints (PRIMARY KEY, UNIQUE, NULL, NOT NULL, DEFAULT)
        while let Some(Token::Keyword(keyword)) = self.next_if_keyword() {
            match keyword {
                Keyword::Null => column.nullable = Some(true),
                Keyword::Not => {
                    self.next_expect(Token::Keyword(Keyword::Null))?;
                    column.nullable = Some(false);
                }
                Keyword::Default => column.default = Some(self.parse_literal()?),
                Keyword::Primary => {
                    self.next_expect(Token::Keyword(Keyword::Key))?;
                    column.primary_key = true;
                }
                Keyword::Unique => column.unique = true,
                k => return Err(Error::Syntax(format!("[Parser] Unexpected keyword {}", k))),
            }
        }

        Ok(column)
    }

    /// Parses CREATE INDEX name ON table (cols)
    fn parse_ddl_create_index(&mut self) -> Result<ast::Statement> {
        let name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::On))?;
        let table_name = self.next_ident()?;
        self.next_expect(Token::OpenParen)?;
        let columns = self.parse_ident_list()?;
        self.next_expect(Token::CloseParen)?;
        Ok(ast::Statement::CreateIndex { name, table_name, columns })
    }

    /// Parses DROP TABLE statement
    fn parse_drop(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Drop))?;
        if self.next_if_token(Token::Keyword(Keyword::Table)).is_none() {
            return Err(self.unsupported());
        }
        Ok(ast::Statement::DropTable { name: self.next_ident()? })
    }

    /// Parses BEGIN / COMMIT / ROLLBACK, each with an optional TRANSACTION
    fn parse_transaction(&mut self, stmt: ast::Statement) -> Result<ast::Statement> {
        self.next()?;
        self.next_if_token(Token::Keyword(Keyword::Transaction));
        Ok(stmt)
    }

    /// Parses SELECT statement
    fn parse_select(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Select))?;
        let select = if self.next_if_token(Token::Asterisk).is_some() {
            Vec::new()
        } else {
            self.parse_field_list()?
        };
        self.next_expect(Token::Keyword(Keyword::From))?;
        let from = self.parse_from_clause()?;
        let where_clause = self.parse_where_clause()?;

        let mut order_by = Vec::new();
        if self.next_if_token(Token::Keyword(Keyword::Order)).is_some() {
            self.next_expect(Token::Keyword(Keyword::By))?;
            order_by = self.parse_field_list()?;
        }

        Ok(ast::Statement::Select { select, from, where_clause, order_by })
    }

    /// Parses `table [JOIN table [ON cond]]*`
    fn parse_from_clause(&mut self) -> Result<FromItem> {
        let mut item = FromItem::Table { name: self.next_ident()? };
        while self.next_if_token(Token::Keyword(Keyword::Join)).is_some() {
            let right = FromItem::Table { name: self.next_ident()? };
            let predicate = match self.next_if_token(Token::Keyword(Keyword::On)) {
                Some(_) => Some(self.parse_expression()?),
                None => None,
            };
            item = FromItem::Join {
                left: Box::new(item),
                right: Box::new(right),
                predicate,
            };
        }
        Ok(item)
    }

    /// Parses INSERT statement
    fn parse_insert(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Insert))?;
        self.next_expect(Token::Keyword(Keyword::Into))?;

        let table_name = self.next_ident()?;

        // Check if specific columns are specified
        let columns = if self.next_if_token(Token::OpenParen).is_some() {
            let cols = self.parse_ident_list()?;
            self.next_expect(Token::CloseParen)?;
            Some(cols)
        } else {
            None
        };

        self.next_expect(Token::Keyword(Keyword::Values))?;
        self.next_expect(Token::OpenParen)?;
        let mut values = Vec::new();
        loop {
            values.push(self.parse_literal()?);
            match self.next()? {
                Token::CloseParen => break,
                Token::Comma => {}
                token => {
                    return Err(Error::Syntax(format!("[Parser] Unexpected token {}", token)));
                }
            }
        }
        Ok(ast::Statement::Insert {
            table_name,
            columns,
            values,
        })
    }

    /// Parses UPDATE statement
    fn parse_update(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Update))?;
        let table_name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::Set))?;

        let mut columns = BTreeMap::new();
        loop {
            let col = self.next_ident()?;
            self.next_expect(Token::Equal)?;
            let value = self.parse_literal()?;
            // Assigning the same column twice in one statement is an error
            if columns.contains_key(&col) {
                return Err(Error::Syntax(format!(
                    "[Parser] Duplicate column {} for update",
                    col
                )));
            }
            columns.insert(col, value);
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }
        Ok(ast::Statement::Update {
            table_name,
            columns,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// Parses DELETE statement
    fn parse_delete(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Delete))?;
        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_ident()?;
        Ok(ast::Statement::Delete {
            table_name,
            where_clause: self.parse_where_clause()?,
        })
    }

    fn parse_where_clause(&mut self) -> Result<Option<Expression>> {
        if self.next_if_token(Token::Keyword(Keyword::Where)).is_none() {
            return Ok(None);
        }
        Ok(Some(self.parse_expression()?))
    }

    /// Parses a predicate.
    ///
    /// AND is split first and OR inside each conjunct, so OR binds tighter:
    /// `a OR b AND c` is `(a OR b) AND c`. Parentheses group explicitly.
    fn parse_expression(&mut self) -> Result<Expression> {
        let mut expr = self.parse_disjunction()?;
        while self.next_if_token(Token::Keyword(Keyword::And)).is_some() {
            let rhs = self.parse_disjunction()?;
            expr = Operation::And(Box::new(expr), Box::new(rhs)).into();
        }
        Ok(expr)
    }

    fn parse_disjunction(&mut self) -> Result<Expression> {
        let mut expr = self.parse_comparison()?;
        while self.next_if_token(Token::Keyword(Keyword::Or)).is_some() {
            let rhs = self.parse_comparison()?;
            expr = Operation::Or(Box::new(expr), Box::new(rhs)).into();
        }
        Ok(expr)
    }

    /// Parses `field <op> literal`, `field LIKE pattern` or `field IS [NOT] NULL`
    fn parse_comparison(&mut self) -> Result<Expression> {
        if self.next_if_token(Token::OpenParen).is_some() {
            let expr = self.parse_expression()?;
            self.next_expect(Token::CloseParen)?;
            return Ok(expr);
        }

        let lhs = Box::new(Expression::Field(self.parse_field()?));
        let op = self.next()?;
        if op == Token::Keyword(Keyword::Is) {
            let negated = self.next_if_token(Token::Keyword(Keyword::Not)).is_some();
            self.next_expect(Token::Keyword(Keyword::Null))?;
            return Ok(if negated { Operation::IsNotNull(lhs) } else { Operation::IsNull(lhs) }.into());
        }

        let rhs = Box::new(Expression::Consts(if op == Token::Keyword(Keyword::Like) {
            self.parse_pattern()?
        } else {
            self.parse_literal()?
        }));
        Ok(match op {
            Token::Equal => Operation::Equal(lhs, rhs),
            Token::NotEqual => Operation::NotEqual(lhs, rhs),
            Token::LessThan => Operation::LessThan(lhs, rhs),
            Token::GreaterThan => Operation::GreaterThan(lhs, rhs),
            Token::LessThanOrEqual => Operation::LessThanOrEqual(lhs, rhs),
            Token::GreaterThanOrEqual => Operation::GreaterThanOrEqual(lhs, rhs),
            Token::Keyword(Keyword::Like) => Operation::Like(lhs, rhs),
            token => {
                return Err(Error::Syntax(format!(
                    "[Parser] Expected comparison operator, got {}",
                    token
                )))
            }
        }
        .into())
    }

    /// Parses a literal value.
    ///
    /// Numbers, quoted strings and bare words all go through `Value::coerce`,
    /// so `'5'` is the integer 5 just like `5`.
    fn parse_literal(&mut self) -> Result<Value> {
        Ok(match self.next()? {
            Token::Number(n) => {
                let value = Value::coerce(&n);
                if matches!(value, Value::Text(_)) && !n.starts_with('-') {
                    // An unsigned number token that does not coerce has overflowed
                    n.parse::<i64>()?;
                }
                value
            }
            Token::String(s) => Value::coerce(&s),
            // Bare words are text, including qualified ones such as `t.col`
            Token::Ident(mut s) => {
                if self.next_if_token(Token::Period).is_some() {
                    s = format!("{}.{}", s, self.next_ident()?);
                }
                Value::coerce(&s)
            }
            Token::Keyword(Keyword::True) => Value::Boolean(true),
            Token::Keyword(Keyword::False) => Value::Boolean(false),
            Token::Keyword(Keyword::Null) => Value::Null,
            t => {
                return Err(Error::Syntax(format!(
                    "[Parser] Unexpected expression token {}",
                    t
                )))
            }
        })
    }

    /// Parses a LIKE pattern, kept as written
    fn parse_pattern(&mut self) -> Result<Value> {
        match self.next()? {
            Token::String(s) | Token::Number(s) | Token::Ident(s) => Ok(Value::Text(s)),
            t => Err(Error::Syntax(format!("[Parser] Expected LIKE pattern, got {}", t))),
        }
    }

    /// Parses a possibly table-qualified column name
    fn parse_field(&mut self) -> Result<String> {
        let mut name = self.next_ident()?;
        if self.next_if_token(Token::Period).is_some() {
            name = format!("{}.{}", name, self.next_ident()?);
        }
        Ok(name)
    }

    fn parse_field_list(&mut self) -> Result<Vec<String>> {
        let mut fields = vec![self.parse_field()?];
        while self.next_if_token(Token::Comma).is_some() {
            fields.push(self.parse_field()?);
        }
        Ok(fields)
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>> {
        let mut idents = vec![self.next_ident()?];
        while self.next_if_token(Token::Comma).is_some() {
            idents.push(self.next_ident()?);
        }
        Ok(idents)
    }

    /// Peeks at the next token
    fn peek(&mut self) -> Result<Option<Token>> {
        self.lexer.peek().cloned().transpose()
    }

    /// Consumes and returns the next token
    fn next(&mut self) -> Result<Token> {
        self.lexer.next().unwrap_or_else(|| Err(Error::Syntax("[Parser] Unexpected end of input".into())))
    }

    /// Expects and consumes an identifier. Non-reserved keywords such as
    /// `key` or `order` are accepted as lowercase names.
    fn next_ident(&mut self) -> Result<String> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            Token::Keyword(keyword) if !keyword.is_reserved() => {
                Ok(keyword.to_str().to_lowercase())
            }
            token => Err(Error::Syntax(format!(
                "[Parser] Expected ident, got token {}",
                token
            ))),
        }
    }

    fn next_number(&mut self) -> Result<String> {
        match self.next()? {
            Token::Number(n) => Ok(n),
            token => Err(Error::Syntax(format!(
                "[Parser] Expected number, got token {}",
                token
            ))),
        }
    }

    /// Expects a specific token, returns error if different
    fn next_expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::Syntax(format!(
                "[Parser] Expected token {}, got {}",
                expect, token
            )));
        }
        Ok(())
    }

    /// Consumes next token if it satisfies the predicate
    fn next_if<F: Fn(&Token) -> bool>(&mut self, predicate: F) -> Option<Token> {
        self.peek().unwrap_or(None).filter(|t| predicate(t))?;
        self.next().ok()
    }

    /// Consumes next token if it's a keyword
    fn next_if_keyword(&mut self) -> Option<Token> {
        self.next_if(|t| matches!(t, Token::Keyword(_)))
    }

    /// Consumes next token if it matches the given token
    fn next_if_token(&mut self, token: Token) -> Option<Token> {
        self.next_if(|t| t == &token)
    }
}
