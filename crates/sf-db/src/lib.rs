//! sf-db - Storage layer for Swapflow
//!
//! This crate provides the `Database` trait (the storage executor every stage
//! runs against), builders for the statements behind the four storage
//! primitives, and the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod sql;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Row};
