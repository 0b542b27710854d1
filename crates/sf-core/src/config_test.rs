use super::*;

const SESSION_SUMMARY: &str = r#"
name: elt_summary
database:
  type: duckdb
  path: dev.duckdb
on_run_start:
  - "SET threads TO 2"
targets:
  prod:
    database:
      path: prod.duckdb
jobs:
  - database: dev
    schema: analytics
    table: session_summary
    select_sql: |
      SELECT u.*, s.ts
      FROM dev.raw.user_session_channel u
      JOIN dev.raw.session_timestamp s ON u.sessionId = s.sessionId
    primary_key: sessionId
"#;

#[test]
fn test_parse_minimal_config() {
    let config = Config::from_yaml("name: test_project").unwrap();
    assert_eq!(config.name, "test_project");
    assert!(config.jobs.is_empty());
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.dialect, Dialect::DuckDb);
    let root = PathBuf::from("/tmp/test");
    assert_eq!(config.target_path_absolute(&root), root.join("target"));
}

#[test]
fn test_parse_full_config() {
    let config = Config::from_yaml(SESSION_SUMMARY).unwrap();
    assert_eq!(config.jobs.len(), 1);

    let job = &config.jobs[0];
    assert_eq!(job.name(), "session_summary");
    assert_eq!(job.target().to_string(), "dev.analytics.session_summary");
    assert_eq!(job.on_empty, EmptyPolicy::Warn);

    let spec = job.validation_spec();
    let pk = spec.primary_key().unwrap();
    assert_eq!(pk.len(), 1);
    assert_eq!(pk[0], "sessionId");
}

#[test]
fn test_resolve_inline_sql_trims() {
    let config = Config::from_yaml(SESSION_SUMMARY).unwrap();
    let sql = config.jobs[0].resolve_sql(Path::new(".")).unwrap();
    assert!(sql.starts_with("SELECT u.*, s.ts"));
    assert!(!sql.ends_with('\n'));
}

#[test]
fn test_resolve_sql_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("orders.sql"), "SELECT 1 AS id\n").unwrap();

    let config = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
    sql_file: orders.sql
"#,
    )
    .unwrap();
    let sql = config.jobs[0].resolve_sql(dir.path()).unwrap();
    assert_eq!(sql, "SELECT 1 AS id");
}

#[test]
fn test_resolve_missing_sql_file() {
    let config = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
    sql_file: missing.sql
"#,
    )
    .unwrap();
    let err = config.jobs[0].resolve_sql(Path::new("/nonexistent")).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_job_requires_exactly_one_query_source() {
    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("exactly one of"));

    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
    select_sql: SELECT 1
    sql_file: orders.sql
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("exactly one of"));
}

#[test]
fn test_empty_identifier_rejected() {
    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: ""
    table: orders
    select_sql: SELECT 1
"#,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_unknown_field_rejected() {
    let err = Config::from_yaml("name: p\nwarehouse: COMPUTE_WH\n").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_composite_primary_key() {
    let config = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
    select_sql: SELECT 1 AS a, 2 AS b
    primary_key: [a, b]
    on_empty: fail
"#,
    )
    .unwrap();
    let spec = config.jobs[0].validation_spec();
    assert_eq!(spec.primary_key().unwrap().len(), 2);
    assert_eq!(spec.on_empty(), EmptyPolicy::Fail);
}

#[test]
fn test_repeated_primary_key_column_rejected() {
    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
    select_sql: SELECT 1 AS a
    primary_key: [a, a]
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_duplicate_job_names_rejected() {
    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - name: same
    database: memory
    schema: main
    table: a
    select_sql: SELECT 1
  - name: same
    database: memory
    schema: main
    table: b
    select_sql: SELECT 1
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Duplicate job name"));
}

#[test]
fn test_shared_target_rejected() {
    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - name: first
    database: memory
    schema: main
    table: orders
    select_sql: SELECT 1
  - name: second
    database: memory
    schema: main
    table: orders
    select_sql: SELECT 2
"#,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::RelationCollision { .. }));
}

#[test]
fn test_target_colliding_with_staging_rejected() {
    let err = Config::from_yaml(
        r#"
name: p
jobs:
  - database: memory
    schema: main
    table: orders
    select_sql: SELECT 1
  - database: memory
    schema: main
    table: temp_orders
    select_sql: SELECT 2
"#,
    )
    .unwrap_err();
    match err {
        CoreError::RelationCollision { relation, .. } => {
            assert_eq!(relation, "memory.main.temp_orders");
        }
        other => panic!("expected RelationCollision, got {other}"),
    }
}

#[test]
fn test_select_jobs_filters_in_declaration_order() {
    let config = Config::from_yaml(
        r#"
name: p
jobs:
  - { database: memory, schema: main, table: a, select_sql: SELECT 1 }
  - { database: memory, schema: main, table: b, select_sql: SELECT 1 }
  - { database: memory, schema: main, table: c, select_sql: SELECT 1 }
"#,
    )
    .unwrap();

    let all = config.select_jobs(None).unwrap();
    assert_eq!(all.len(), 3);

    let picked = config.select_jobs(Some("c, a")).unwrap();
    let names: Vec<&str> = picked.iter().map(|j| j.name()).collect();
    assert_eq!(names, vec!["a", "c"]);

    let err = config.select_jobs(Some("zzz")).unwrap_err();
    assert!(matches!(err, CoreError::JobNotFound { .. }));
}

#[test]
fn test_target_overrides() {
    let config = Config::from_yaml(SESSION_SUMMARY).unwrap();

    let base = config.get_database_config(None).unwrap();
    assert_eq!(base.path, "dev.duckdb");

    let prod = config.get_database_config(Some("prod")).unwrap();
    assert_eq!(prod.path, "prod.duckdb");

    // prod does not override session statements
    let stmts = config.get_on_run_start(Some("prod")).unwrap();
    assert_eq!(stmts, vec!["SET threads TO 2".to_string()]);

    let err = config.get_database_config(Some("qa")).unwrap_err();
    assert!(err.to_string().contains("Available targets: prod"));
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("swapflow.yml"), SESSION_SUMMARY).unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "elt_summary");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_parse_error_mentions_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swapflow.yml");
    std::fs::write(&path, "name: [unclosed").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("swapflow.yml"));
}

#[test]
fn test_demo_project_loads() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/session_summary");
    let config = Config::load_from_dir(&dir).unwrap();
    let job = &config.jobs[0];
    assert_eq!(job.target().to_string(), "dev.analytics.session_summary");
    assert!(job.resolve_sql(&dir).unwrap().contains("raw.session_timestamp"));
    assert_eq!(
        job.validation_spec().primary_key().unwrap()[0],
        "sessionId"
    );
}
