//! RustDB - a small embedded relational database
//!
//! This crate provides:
//! - SQL parsing (lexer, parser, AST)
//! - Schema, nullability, type and uniqueness checks
//! - Hash indexes maintained alongside each table
//! - A statement-log transaction manager with snapshot rollback
//! - Whole-table snapshot persistence

pub mod config;
pub mod error;
pub mod sql;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use sql::{engine::Database, executor::ResultSet, types::Value};
