//! Dialect-aware SQL parser

use crate::error::{SqlError, SqlResult};
use sf_core::Dialect;
use sqlparser::ast::Statement;
use sqlparser::dialect::{self as grammar, DuckDbDialect, SnowflakeDialect};
use sqlparser::parser::{Parser, ParserError};

/// SQL parser for one configured dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlParser {
    dialect: Dialect,
}

impl SqlParser {
    /// Create a new parser with DuckDB dialect
    pub fn duckdb() -> Self {
        Self::for_dialect(Dialect::DuckDb)
    }

    /// Create a new parser with Snowflake dialect
    pub fn snowflake() -> Self {
        Self::for_dialect(Dialect::Snowflake)
    }

    /// Create a parser for the configured dialect
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        Parser::parse_sql(self.grammar().as_ref(), sql).map_err(parse_error)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        match self.dialect {
            Dialect::DuckDb => "duckdb",
            Dialect::Snowflake => "snowflake",
        }
    }

    fn grammar(&self) -> Box<dyn grammar::Dialect> {
        match self.dialect {
            Dialect::DuckDb => Box::new(DuckDbDialect {}),
            Dialect::Snowflake => Box::new(SnowflakeDialect {}),
        }
    }
}

fn parse_error(err: ParserError) -> SqlError {
    let message = err.to_string();
    let (line, column) = error_location(&message).unwrap_or((0, 0));
    SqlError::ParseError {
        message,
        line,
        column,
    }
}

/// `ParserError` only carries its position as text: "... at Line: 2, Column: 17".
fn error_location(message: &str) -> Option<(usize, usize)> {
    let (_, tail) = message.rsplit_once("Line: ")?;
    let (line, tail) = tail.split_once(", Column: ")?;
    let digits = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    Some((line.trim().parse().ok()?, tail[..digits].parse().ok()?))
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
