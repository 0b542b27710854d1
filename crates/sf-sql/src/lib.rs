//! sf-sql - SQL parsing layer for Swapflow
//!
//! This crate wraps sqlparser-rs with dialect support and checks that a job's
//! query is a single read-only statement before it is materialized.

pub mod error;
pub mod parser;
pub mod preflight;

pub use error::{SqlError, SqlResult};
pub use parser::SqlParser;
pub use preflight::check_select_query;
