//! SQL processing module
//!
//! This module provides:
//! - `parser`: SQL lexer, parser and statement AST
//! - `types`: value model and literal coercion
//! - `schema`: table and column definitions
//! - `index`: hash indexes over row positions
//! - `plan`: execution plan generation
//! - `executor`: query and mutation execution
//! - `engine`: catalog, transactions and the `Database` facade

pub mod parser;
pub mod types;
pub mod schema;
pub mod index;
pub mod plan;
pub mod executor;
pub mod engine;
