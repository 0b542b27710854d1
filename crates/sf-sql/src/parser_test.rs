use super::*;

#[test]
fn test_parse_select() {
    let parser = SqlParser::duckdb();
    let stmts = parser
        .parse("SELECT id, name FROM users WHERE id = 1")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_multiple_statements() {
    let parser = SqlParser::duckdb();
    let stmts = parser.parse("SELECT 1; SELECT 2;").unwrap();
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_parse_empty() {
    let parser = SqlParser::duckdb();
    assert!(matches!(parser.parse("   "), Err(SqlError::EmptySql)));
}

#[test]
fn test_parse_error() {
    let parser = SqlParser::duckdb();
    assert!(parser.parse("SELECT * FROM users WHERE id = = 1").is_err());
}

#[test]
fn test_for_dialect() {
    assert_eq!(SqlParser::for_dialect(Dialect::DuckDb).dialect_name(), "duckdb");
    assert_eq!(
        SqlParser::for_dialect(Dialect::Snowflake).dialect_name(),
        "snowflake"
    );
}

#[test]
fn test_snowflake_qualified_join() {
    let parser = SqlParser::snowflake();
    let stmts = parser
        .parse("SELECT u.*, s.ts FROM dev.raw.u u JOIN dev.raw.s s ON u.sessionId = s.sessionId")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_error_reports_line() {
    let parser = SqlParser::duckdb();
    match parser.parse("SELECT id\nFROM users WHERE id = = 3") {
        Err(SqlError::ParseError { line, message, .. }) => {
            assert_eq!(line, 2, "message: {}", message);
        }
        other => panic!("expected parse error, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn test_error_location() {
    assert_eq!(
        error_location("Expected: an expression, found: = at Line: 5, Column: 10"),
        Some((5, 10))
    );
    assert_eq!(error_location("Some error without location"), None);
}
