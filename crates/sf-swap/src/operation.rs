//! The validated swap: stage, validate, provision, swap

use crate::error::{SwapError, SwapResult};
use crate::job::SwapJob;
use crate::outcome::{FailureDetail, OperationOutcome, Progress};
use crate::provision::TargetProvisioner;
use crate::stage::Stage;
use crate::staging::StagingBuilder;
use crate::swap::AtomicSwapper;
use sf_check::{IntegrityValidator, ValidationResult};
use sf_core::{Dialect, EmptyPolicy};
use sf_db::Database;
use sf_sql::SqlParser;
use std::time::Instant;

/// Runs validated swaps against an injected storage session.
///
/// Stages run one after another and each must succeed before the next
/// starts. Nothing is retried and completed stages are not undone: on
/// failure the target is unchanged and the staging relation stays behind
/// for inspection.
pub struct SwapOperation<'a> {
    db: &'a dyn Database,
    parser: SqlParser,
}

impl<'a> SwapOperation<'a> {
    /// Operation that checks queries with the DuckDB dialect
    pub fn new(db: &'a dyn Database) -> Self {
        Self {
            db,
            parser: SqlParser::duckdb(),
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.parser = SqlParser::for_dialect(dialect);
        self
    }

    /// Run one job to completion or to its first failure.
    pub async fn run(&self, job: &SwapJob) -> OperationOutcome {
        let start = Instant::now();
        let mut progress = Progress::new();

        log::info!(
            "Running job '{}' for {} on {}",
            job.name,
            job.target,
            self.db.db_type()
        );
        let result = self.drive(job, &mut progress).await;

        let error = match &result {
            Ok(()) => {
                log::info!("Job '{}' swapped {}", job.name, job.target);
                None
            }
            Err(err) => {
                log::error!("Error occurred: {}", err);
                Some(FailureDetail::from(err))
            }
        };

        OperationOutcome {
            job: job.name.clone(),
            target: job.target.to_string(),
            staging: job.staging().to_string(),
            success: result.is_ok(),
            stage: progress.stage,
            staged_rows: progress.staged_rows(),
            completed_stages: progress.completed,
            target_created: progress.target_created,
            validation: progress.validation,
            warnings: progress.warnings,
            error,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Run one job, returning the typed error instead of an outcome.
    pub async fn try_run(&self, job: &SwapJob) -> SwapResult<()> {
        let mut progress = Progress::new();
        self.drive(job, &mut progress).await
    }

    async fn drive(&self, job: &SwapJob, progress: &mut Progress) -> SwapResult<()> {
        let staging = StagingBuilder::new(self.db, &self.parser)
            .build(job)
            .await?;
        progress.advance(Stage::Staged);

        let result = IntegrityValidator::new(self.db)
            .validate(&staging, &job.validation)
            .await
            .map_err(|source| SwapError::Storage {
                stage: Stage::Validated,
                source,
            })?;
        progress.validation = Some(result.clone());
        if let Some(err) = SwapError::from_validation(&staging, &result) {
            return Err(err);
        }
        if let ValidationResult::Pass { total_rows: 0 } = result {
            if job.validation.on_empty() == EmptyPolicy::Warn {
                progress.warn(format!(
                    "Query for {} returned no rows, publishing an empty table",
                    job.target
                ));
            }
        }
        progress.advance(Stage::Validated);

        progress.target_created = TargetProvisioner::new(self.db)
            .provision(&job.target, &staging)
            .await?;
        progress.advance(Stage::Provisioned);

        AtomicSwapper::new(self.db)
            .swap(&job.target, &staging)
            .await?;
        progress.advance(Stage::Swapped);

        Ok(())
    }
}
