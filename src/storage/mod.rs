//! Snapshot storage
//!
//! Each table is persisted as one opaque snapshot keyed by the table name.
//! Stores only move bytes around; encoding a table is the catalog's job.

pub mod engine;
pub mod file;
pub mod memory;

pub use engine::Store;
pub use file::FileStore;
pub use memory::MemoryStore;
