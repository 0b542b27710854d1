//! Storage executor trait

use crate::error::DbResult;
use async_trait::async_trait;
use sf_core::RelationRef;

/// One result row with every column read as text (`None` for SQL NULL).
pub type Row = Vec<Option<String>>;

/// Storage executor every swap stage runs against.
///
/// Implementations must be Send + Sync for async operation. Besides plain
/// statement execution they provide the four primitives a validated swap
/// needs: create-from-query, create-empty-with-shape-of, a single-row
/// aggregate fetch, and an atomic exchange of two relations.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Count the rows a query returns
    async fn query_count(&self, sql: &str) -> DbResult<u64>;

    /// Fetch the first row of a query, or `None` when it returns no rows.
    ///
    /// Every column must already be text; callers cast in SQL.
    async fn query_one(&self, sql: &str) -> DbResult<Option<Row>>;

    /// Check if a table or view exists
    async fn relation_exists(&self, relation: &RelationRef) -> DbResult<bool>;

    /// Create table from SELECT statement
    async fn create_table_as(
        &self,
        relation: &RelationRef,
        select: &str,
        replace: bool,
    ) -> DbResult<()>;

    /// Create `target` with the column shape of `source` and no rows, unless
    /// `target` already exists
    async fn create_empty_like(&self, target: &RelationRef, source: &RelationRef) -> DbResult<()>;

    /// Exchange the contents of two relations in one indivisible operation
    async fn swap_relations(&self, left: &RelationRef, right: &RelationRef) -> DbResult<()>;

    /// Drop a table if it exists
    async fn drop_if_exists(&self, relation: &RelationRef) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
