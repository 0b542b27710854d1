//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::sql;
use crate::traits::{Database, Row};
use async_trait::async_trait;
use duckdb::Connection;
use sf_core::RelationRef;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection.
    ///
    /// The in-memory catalog is named `memory`.
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path.
    ///
    /// The catalog is named after the file stem (`dev.duckdb` -> `dev`).
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        log::info!("Executing: {}", sql);
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        log::info!("Executing: {}", sql);
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<u64> {
        let count_sql = sql::count_rows(sql);
        log::info!("Executing: {}", count_sql);
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&count_sql, [], |row| row.get(0))
            .map_err(DbError::from)?;
        u64::try_from(count)
            .map_err(|_| DbError::UnexpectedResult(format!("negative row count {}", count)))
    }

    /// Fetch the first row synchronously
    fn query_one_sync(&self, sql: &str) -> DbResult<Option<Row>> {
        log::info!("Executing: {}", sql);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(DbError::from)?;
        let mut rows = stmt.query([]).map_err(DbError::from)?;

        let Some(row) = rows.next().map_err(DbError::from)? else {
            return Ok(None);
        };

        let statement: &duckdb::Statement<'_> = row.as_ref();
        let width = statement.column_count();
        let mut values = Vec::with_capacity(width);
        for idx in 0..width {
            let value: Option<String> = row.get(idx).map_err(|e| {
                DbError::UnexpectedResult(format!("column {} is not text: {}", idx, e))
            })?;
            values.push(value);
        }
        Ok(Some(values))
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, relation: &RelationRef) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&sql::relation_exists(relation), [], |row| row.get(0))
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Run the three swap renames inside one transaction.
    ///
    /// DuckDB catalog changes are transactional: either every rename commits
    /// or the transaction is rolled back when `tx` is dropped on error.
    fn swap_sync(&self, left: &RelationRef, right: &RelationRef) -> DbResult<()> {
        if !left.same_namespace(right) {
            return Err(DbError::InvalidSwap {
                left: left.to_string(),
                right: right.to_string(),
                reason: "relations must share a database and schema".to_string(),
            });
        }
        if left == right {
            return Err(DbError::InvalidSwap {
                left: left.to_string(),
                right: right.to_string(),
                reason: "a relation cannot be swapped with itself".to_string(),
            });
        }

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| DbError::ExecutionError(format!("BEGIN TRANSACTION: {}", e)))?;
        for stmt in sql::swap_renames(left, right) {
            log::info!("Executing: {}", stmt);
            tx.execute(&stmt, [])
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, stmt)))?;
        }
        tx.commit()
            .map_err(|e| DbError::ExecutionError(format!("COMMIT: {}", e)))
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_count(&self, sql: &str) -> DbResult<u64> {
        self.query_count_sync(sql)
    }

    async fn query_one(&self, sql: &str) -> DbResult<Option<Row>> {
        self.query_one_sync(sql)
    }

    async fn relation_exists(&self, relation: &RelationRef) -> DbResult<bool> {
        self.relation_exists_sync(relation)
    }

    async fn create_table_as(
        &self,
        relation: &RelationRef,
        select: &str,
        replace: bool,
    ) -> DbResult<()> {
        self.execute_sync(&sql::create_table_as(relation, select, replace))?;
        Ok(())
    }

    async fn create_empty_like(&self, target: &RelationRef, source: &RelationRef) -> DbResult<()> {
        self.execute_sync(&sql::create_empty_like(target, source))?;
        Ok(())
    }

    async fn swap_relations(&self, left: &RelationRef, right: &RelationRef) -> DbResult<()> {
        self.swap_sync(left, right)
    }

    async fn drop_if_exists(&self, relation: &RelationRef) -> DbResult<()> {
        self.execute_sync(&sql::drop_table(relation))?;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
