//! Error types for sf-sql

use thiserror::Error;

/// SQL parsing and pre-flight errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Statement that is not a query (S003)
    #[error("[S003] Unsupported SQL statement type: {0}")]
    UnsupportedStatement(String),

    /// More than one statement where exactly one query is expected (S004)
    #[error("[S004] Expected a single query, found {0} statements")]
    MultipleStatements(usize),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
