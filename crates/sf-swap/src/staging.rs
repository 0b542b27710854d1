//! Staging builder: materializes a job's query into `temp_<table>`

use crate::error::{StagingCause, SwapError, SwapResult};
use crate::job::SwapJob;
use sf_core::RelationRef;
use sf_db::Database;
use sf_sql::{check_select_query, SqlParser};

/// Builds the staging relation for a job.
///
/// The target is never read or written here.
pub struct StagingBuilder<'a> {
    db: &'a dyn Database,
    parser: &'a SqlParser,
}

impl<'a> StagingBuilder<'a> {
    pub fn new(db: &'a dyn Database, parser: &'a SqlParser) -> Self {
        Self { db, parser }
    }

    /// Run the job's pre-hooks, then materialize its query into the staging
    /// relation, replacing whatever a previous run left there.
    pub async fn build(&self, job: &SwapJob) -> SwapResult<RelationRef> {
        let staging = job.staging();
        let fail = |source: StagingCause| SwapError::StagingCreationFailed {
            staging: staging.clone(),
            source,
        };

        check_select_query(self.parser, &job.select_sql).map_err(|e| fail(e.into()))?;

        for statement in &job.pre_hook {
            self.db
                .execute(statement)
                .await
                .map_err(|e| fail(e.into()))?;
        }

        if self
            .db
            .relation_exists(&staging)
            .await
            .map_err(|e| fail(e.into()))?
        {
            log::warn!(
                "Staging relation {} already exists from an earlier run, replacing it",
                staging
            );
        }

        log::info!("Running CTAS for table: {}", staging);
        self.db
            .create_table_as(&staging, &job.select_sql, true)
            .await
            .map_err(|e| fail(e.into()))?;

        Ok(staging)
    }
}

#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;
