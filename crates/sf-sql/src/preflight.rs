//! Pre-flight checks on a job's query before it is materialized.

use crate::error::{SqlError, SqlResult};
use crate::parser::SqlParser;
use sqlparser::ast::Statement;

/// Check that `sql` is exactly one query statement.
///
/// The query is spliced into `CREATE TABLE ... AS <query>`, so anything other
/// than a single `SELECT`/`WITH`/`VALUES` query is rejected before it reaches
/// storage.
pub fn check_select_query(parser: &SqlParser, sql: &str) -> SqlResult<()> {
    let statements = parser.parse(sql)?;
    match statements.as_slice() {
        [] => Err(SqlError::EmptySql),
        [Statement::Query(_)] => Ok(()),
        [other] => Err(SqlError::UnsupportedStatement(statement_kind(other))),
        many => Err(SqlError::MultipleStatements(many.len())),
    }
}

/// First keyword(s) of a statement, for error messages.
fn statement_kind(statement: &Statement) -> String {
    let text = statement.to_string();
    text.split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_passes() {
        let parser = SqlParser::duckdb();
        assert!(check_select_query(&parser, "SELECT 1 AS id").is_ok());
    }

    #[test]
    fn test_cte_passes() {
        let parser = SqlParser::duckdb();
        let sql = "WITH t AS (SELECT 1 AS id) SELECT * FROM t";
        assert!(check_select_query(&parser, sql).is_ok());
    }

    #[test]
    fn test_trailing_semicolon_passes() {
        let parser = SqlParser::duckdb();
        assert!(check_select_query(&parser, "SELECT 1;").is_ok());
    }

    #[test]
    fn test_drop_rejected() {
        let parser = SqlParser::duckdb();
        let err = check_select_query(&parser, "DROP TABLE orders").unwrap_err();
        match err {
            SqlError::UnsupportedStatement(kind) => assert_eq!(kind, "DROP TABLE"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stacked_statements_rejected() {
        let parser = SqlParser::duckdb();
        let err = check_select_query(&parser, "SELECT 1; DELETE FROM orders").unwrap_err();
        assert!(matches!(err, SqlError::MultipleStatements(2)));
    }

    #[test]
    fn test_empty_rejected() {
        let parser = SqlParser::duckdb();
        assert!(matches!(
            check_select_query(&parser, ""),
            Err(SqlError::EmptySql)
        ));
    }
}
