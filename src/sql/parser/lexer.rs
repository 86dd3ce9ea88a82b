//! SQL Lexer - Tokenizes SQL input text into a stream of tokens

use std::{fmt::Display, iter::Peekable, str::Chars};

use crate::error::{Error, Result};

/// Represents a single lexical token in the SQL input
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// SQL reserved keyword
    Keyword(Keyword),
    /// Identifier such as table name or column name
    Ident(String),
    /// String literal, without its quotes
    String(String),
    /// Numeric literal, optionally signed
    Number(String),
    /// Operators and punctuation
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Asterisk,
    Period,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Token::Keyword(keyword) => keyword.to_str(),
            Token::Ident(ident) => ident,
            Token::String(v) => v,
            Token::Number(n) => n,
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Asterisk => "*",
            Token::Period => ".",
            Token::Equal => "=",
            Token::NotEqual => "!=",
            Token::LessThan => "<",
            Token::GreaterThan => ">",
            Token::LessThanOrEqual => "<=",
            Token::GreaterThanOrEqual => ">=",
        })
    }
}

/// SQL reserved keywords
#[derive(Debug, Clone, PartialEq)]
pub enum Keyword {
    // DDL keywords
    Create,
    Table,
    Index,
    Drop,
    On,
    // DML keywords
    Select,
    From,
    Join,
    Where,
    Order,
    By,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    // Predicate keywords
    And,
    Or,
    Like,
    Is,
    Not,
    // Literal keywords
    True,
    False,
    Null,
    Default,
    // Constraint keywords
    Primary,
    Key,
    Unique,
    // Transaction keywords
    Begin,
    Transaction,
    Commit,
    Rollback,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_ref() {
            "CREATE" => Keyword::Create,
            "TABLE" => Keyword::Table,
            "INDEX" => Keyword::Index,
            "DROP" => Keyword::Drop,
            "ON" => Keyword::On,
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "JOIN" => Keyword::Join,
            "WHERE" => Keyword::Where,
            "ORDER" => Keyword::Order,
            "BY" => Keyword::By,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "VALUES" => Keyword::Values,
            "UPDATE" => Keyword::Update,
            "SET" => Keyword::Set,
            "DELETE" => Keyword::Delete,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "LIKE" => Keyword::Like,
            "IS" => Keyword::Is,
            "NOT" => Keyword::Not,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "NULL" => Keyword::Null,
            "DEFAULT" => Keyword::Default,
            "PRIMARY" => Keyword::Primary,
            "KEY" => Keyword::Key,
            "UNIQUE" => Keyword::Unique,
            "BEGIN" => Keyword::Begin,
            "TRANSACTION" => Keyword::Transaction,
            "COMMIT" => Keyword::Commit,
            "ROLLBACK" => Keyword::Rollback,
            _ => return None,
        })
    }

    /// Returns the uppercase string representation of the keyword
    pub fn to_str(&self) -> &str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Table => "TABLE",
            Keyword::Index => "INDEX",
            Keyword::Drop => "DROP",
            Keyword::On => "ON",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Join => "JOIN",
            Keyword::Where => "WHERE",
            Keyword::Order => "ORDER",
            Keyword::By => "BY",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Delete => "DELETE",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Like => "LIKE",
            Keyword::Is => "IS",
            Keyword::Not => "NOT",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
            Keyword::Null => "NULL",
            Keyword::Default => "DEFAULT",
            Keyword::Primary => "PRIMARY",
            Keyword::Key => "KEY",
            Keyword::Unique => "UNIQUE",
            Keyword::Begin => "BEGIN",
            Keyword::Transaction => "TRANSACTION",
            Keyword::Commit => "COMMIT",
            Keyword::Rollback => "ROLLBACK",
        }
    }

    /// Reserved keywords can never name a table or column
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Keyword::Create
                | Keyword::Table
                | Keyword::Drop
                | Keyword::Select
                | Keyword::From
                | Keyword::Join
                | Keyword::Where
                | Keyword::Insert
                | Keyword::Into
                | Keyword::Values
                | Keyword::Update
                | Keyword::Delete
                | Keyword::And
                | Keyword::Or
                | Keyword::Not
                | Keyword::True
                | Keyword::False
                | Keyword::Null
        )
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// SQL lexical analyzer (lexer/tokenizer)
pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scan() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => self
                .iter
                .peek()
                .map(|c| Err(Error::Syntax(format!("[Lexer] Unexpected character {}", c)))),
            Err(err) => Some(Err(err)),
        }
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given SQL text
    pub fn new(sql_text: &'a str) -> Self {
        Self {
            iter: sql_text.chars().peekable(),
        }
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.peek().filter(|&c| predicate(*c))?;
        self.iter.next()
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    /// Skips whitespace and `--` line comments. A single `-` starts a signed
    /// number, which is returned directly.
    fn skip_trivia(&mut self) -> Result<Option<Token>> {
        loop {
            self.next_while(|c| c.is_whitespace());
            if self.iter.peek() != Some(&'-') {
                return Ok(None);
            }
            self.iter.next();
            match self.iter.peek() {
                Some('-') => {
                    self.next_while(|c| c != '\n');
                }
                Some(c) if c.is_ascii_digit() || *c == '.' => {
                    return Ok(self.scan_number("-"));
                }
                _ => return Err(Error::Syntax("[Lexer] Unexpected character -".into())),
            }
        }
    }

    /// Scans and returns the next token
    fn scan(&mut self) -> Result<Option<Token>> {
        if let Some(number) = self.skip_trivia()? {
            return Ok(Some(number));
        }
        match self.iter.peek().copied() {
            Some('\'') => self.scan_string(),
            Some('!') => {
                self.iter.next();
                match self.next_if(|c| c == '=') {
                    Some(_) => Ok(Some(Token::NotEqual)),
                    None => Err(Error::Syntax("[Lexer] Expected = after !".into())),
                }
            }
            Some(c) if c.is_ascii_digit() => Ok(self.scan_number("")),
            Some('.') if self.digit_after_next() => Ok(self.scan_number("")),
            Some(c) if c.is_alphabetic() || c == '_' => Ok(self.scan_ident()),
            Some(_) => Ok(self.scan_symbol()),
            None => Ok(None),
        }
    }

    /// Whether the character after the next one is a digit, as in `.5`
    fn digit_after_next(&self) -> bool {
        let mut ahead = self.iter.clone();
        ahead.next();
        ahead.next().is_some_and(|c| c.is_ascii_digit())
    }

    /// Scans a string literal (enclosed in single quotes, `''` escapes a quote)
    fn scan_string(&mut self) -> Result<Option<Token>> {
        self.iter.next();
        let mut val = String::new();

        loop {
            match self.iter.next() {
                Some('\'') if self.next_if(|c| c == '\'').is_some() => val.push('\''),
                Some('\'') => break,
                Some(c) => val.push(c),
                None => return Err(Error::Syntax("[Lexer] Unexpected end of string".into())),
            }
        }
        Ok(Some(Token::String(val)))
    }

    /// Scans a numeric literal (integer or floating-point)
    fn scan_number(&mut self, sign: &str) -> Option<Token> {
        let mut val = sign.to_string();
        if let Some(digits) = self.next_while(|c| c.is_ascii_digit()) {
            val.push_str(&digits);
        }
        if let Some(sep) = self.next_if(|c| c == '.') {
            val.push(sep);
            while let Some(c) = self.next_if(|c| c.is_ascii_digit()) {
                val.push(c);
            }
        }
        Some(Token::Number(val))
    }

    /// Scans an identifier or keyword
    fn scan_ident(&mut self) -> Option<Token> {
        let mut val = self.next_if(|c| c.is_alphabetic() || c == '_')?.to_string();
        while let Some(c) = self.next_if(|c| c.is_alphanumeric() || c == '_') {
            val.push(c);
        }
        // Identifiers keep their case; keywords are matched case-insensitively
        Some(Keyword::from_str(&val).map_or(Token::Ident(val), Token::Keyword))
    }

    /// Scans a one- or two-character symbol token
    fn scan_symbol(&mut self) -> Option<Token> {
        let token = match self.iter.peek()? {
            '*' => Token::Asterisk,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '.' => Token::Period,
            '=' => Token::Equal,
            '<' => {
                self.iter.next();
                return Some(if self.next_if(|c| c == '=').is_some() {
                    Token::LessThanOrEqual
                } else if self.next_if(|c| c == '>').is_some() {
                    Token::NotEqual
                } else {
                    Token::LessThan
                });
            }
            '>' => {
                self.iter.next();
                return Some(if self.next_if(|c| c == '=').is_some() {
                    Token::GreaterThanOrEqual
                } else {
                    Token::GreaterThan
                });
            }
            _ => return None,
        };
        self.iter.next();
        Some(token)
    }
}
