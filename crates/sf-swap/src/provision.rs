//! Target provisioner: makes sure the target exists before the swap

use crate::error::{SwapError, SwapResult};
use sf_core::RelationRef;
use sf_db::Database;

/// Creates the target with the staged column shape and zero rows when it is
/// missing. An existing target is left untouched, whatever its shape.
pub struct TargetProvisioner<'a> {
    db: &'a dyn Database,
}

impl<'a> TargetProvisioner<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Returns `true` when the target was created by this call.
    pub async fn provision(&self, target: &RelationRef, staging: &RelationRef) -> SwapResult<bool> {
        let fail = |source| SwapError::TargetProvisioningFailed {
            target: target.clone(),
            source,
        };

        if self.db.relation_exists(target).await.map_err(fail)? {
            log::info!("Target {} already exists", target);
            return Ok(false);
        }

        log::info!("Creating empty target {} shaped like {}", target, staging);
        self.db
            .create_empty_like(target, staging)
            .await
            .map_err(fail)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_db::DuckDbBackend;

    fn rel(name: &str) -> RelationRef {
        RelationRef::from_parts("memory", "main", name).unwrap()
    }

    #[tokio::test]
    async fn test_creates_missing_target_empty() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute("CREATE TABLE temp_orders AS SELECT 1 AS id, 'x' AS name")
            .await
            .unwrap();

        let created = TargetProvisioner::new(&db)
            .provision(&rel("orders"), &rel("temp_orders"))
            .await
            .unwrap();

        assert!(created);
        assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 0);
        let columns = db
            .query_count(
                "SELECT column_name FROM information_schema.columns WHERE table_name = 'orders'",
            )
            .await
            .unwrap();
        assert_eq!(columns, 2);
    }

    #[tokio::test]
    async fn test_provisioning_is_idempotent() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute("CREATE TABLE temp_orders AS SELECT 1 AS id")
            .await
            .unwrap();
        let provisioner = TargetProvisioner::new(&db);

        assert!(provisioner
            .provision(&rel("orders"), &rel("temp_orders"))
            .await
            .unwrap());
        assert!(!provisioner
            .provision(&rel("orders"), &rel("temp_orders"))
            .await
            .unwrap());
        assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_existing_target_keeps_rows() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE temp_orders AS SELECT 1 AS id;
             CREATE TABLE orders AS SELECT * FROM range(5) t(id);",
        )
        .await
        .unwrap();

        let created = TargetProvisioner::new(&db)
            .provision(&rel("orders"), &rel("temp_orders"))
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_existing_target_matched_regardless_of_case() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE temp_Orders AS SELECT 1 AS id;
             CREATE TABLE orders AS SELECT * FROM range(3) t(id);",
        )
        .await
        .unwrap();

        let created = TargetProvisioner::new(&db)
            .provision(&rel("Orders"), &rel("temp_Orders"))
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(db.query_count("SELECT * FROM orders").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_staging_fails() {
        let db = DuckDbBackend::in_memory().unwrap();

        let err = TargetProvisioner::new(&db)
            .provision(&rel("orders"), &rel("temp_orders"))
            .await
            .unwrap_err();

        assert!(matches!(err, SwapError::TargetProvisioningFailed { .. }));
    }
}
