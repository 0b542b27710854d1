//! Atomic swapper: publishes the staged rows

use crate::error::{SwapError, SwapResult};
use sf_core::RelationRef;
use sf_db::Database;

/// Exchanges target and staging in one storage operation.
///
/// On success the target holds the staged rows and the staging relation
/// holds the previous generation. On failure neither relation has changed.
pub struct AtomicSwapper<'a> {
    db: &'a dyn Database,
}

impl<'a> AtomicSwapper<'a> {
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    pub async fn swap(&self, target: &RelationRef, staging: &RelationRef) -> SwapResult<()> {
        log::info!("Swapping {} with {}", target, staging);
        self.db
            .swap_relations(target, staging)
            .await
            .map_err(|source| SwapError::SwapFailed {
                target: target.clone(),
                staging: staging.clone(),
                source,
            })
    }
}
