//! Error types for sf-swap

use crate::stage::Stage;
use serde::Serialize;
use sf_check::ValidationResult;
use sf_core::RelationRef;
use sf_db::DbError;
use sf_sql::SqlError;
use std::fmt;
use thiserror::Error;

/// Broad class of a failed run, used for exit codes and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The staged rows broke a validation rule
    DataQuality,
    /// Storage, connectivity, or query fault
    Infrastructure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::DataQuality => write!(f, "data quality"),
            ErrorCategory::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

/// Serializable tag of a [`SwapError`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    StagingCreationFailed,
    PrimaryKeyViolation,
    DuplicateRowsViolation,
    EmptyResult,
    TargetProvisioningFailed,
    SwapFailed,
    Storage,
}

/// Why the staging relation could not be built
#[derive(Error, Debug)]
pub enum StagingCause {
    /// The job's query was rejected before reaching storage
    #[error(transparent)]
    Query(#[from] SqlError),

    /// Storage refused a pre-hook or the CTAS itself
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Failure of one validated swap
#[derive(Error, Debug)]
pub enum SwapError {
    /// V001: The staging relation could not be materialized
    #[error("[V001] Staging creation failed for {staging}: {source}")]
    StagingCreationFailed {
        staging: RelationRef,
        #[source]
        source: StagingCause,
    },

    /// V002: Two or more staged rows share a primary key
    #[error(
        "[V002] Primary key violation in {staging}: ({}) = ({}) appears {count} times",
        .columns.join(", "),
        render_key(.key)
    )]
    PrimaryKeyViolation {
        staging: RelationRef,
        columns: Vec<String>,
        key: Vec<Option<String>>,
        count: u64,
    },

    /// V003: Two or more staged rows are identical across every column
    #[error(
        "[V003] Duplicate rows in {staging}: total {total}, distinct {distinct}"
    )]
    DuplicateRowsViolation {
        staging: RelationRef,
        total: u64,
        distinct: u64,
    },

    /// V004: The query returned no rows and the job rejects empty loads
    #[error("[V004] Query returned no rows for {staging} and on_empty is 'fail'")]
    EmptyResult { staging: RelationRef },

    /// V005: The target relation could not be created
    #[error("[V005] Target provisioning failed for {target}: {source}")]
    TargetProvisioningFailed {
        target: RelationRef,
        #[source]
        source: DbError,
    },

    /// V006: The exchange of target and staging failed
    #[error(
        "[V006] Swap of {target} with {staging} failed, operator attention required: {source}"
    )]
    SwapFailed {
        target: RelationRef,
        staging: RelationRef,
        #[source]
        source: DbError,
    },

    /// V007: Storage fault while a stage was inspecting data
    #[error("[V007] Storage error during {} stage: {source}", .stage.component())]
    Storage {
        stage: Stage,
        #[source]
        source: DbError,
    },
}

/// Result type alias for SwapError
pub type SwapResult<T> = Result<T, SwapError>;

fn render_key(key: &[Option<String>]) -> String {
    key.iter()
        .map(|v| v.as_deref().unwrap_or("NULL"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SwapError {
    /// Turn a non-pass validation result into the matching error.
    ///
    /// Returns `None` for [`ValidationResult::Pass`].
    pub fn from_validation(staging: &RelationRef, result: &ValidationResult) -> Option<Self> {
        let staging = staging.clone();
        match result {
            ValidationResult::Pass { .. } => None,
            ValidationResult::PrimaryKeyViolation {
                columns,
                key,
                count,
            } => Some(SwapError::PrimaryKeyViolation {
                staging,
                columns: columns.clone(),
                key: key.clone(),
                count: *count,
            }),
            ValidationResult::DuplicateRowsViolation { total, distinct } => {
                Some(SwapError::DuplicateRowsViolation {
                    staging,
                    total: *total,
                    distinct: *distinct,
                })
            }
            ValidationResult::EmptyResult => Some(SwapError::EmptyResult { staging }),
        }
    }

    /// Whether the failure is a rule violation or a fault
    pub fn category(&self) -> ErrorCategory {
        match self {
            SwapError::PrimaryKeyViolation { .. }
            | SwapError::DuplicateRowsViolation { .. }
            | SwapError::EmptyResult { .. } => ErrorCategory::DataQuality,
            SwapError::StagingCreationFailed { .. }
            | SwapError::TargetProvisioningFailed { .. }
            | SwapError::SwapFailed { .. }
            | SwapError::Storage { .. } => ErrorCategory::Infrastructure,
        }
    }

    /// The stage the run failed to reach
    pub fn stage(&self) -> Stage {
        match self {
            SwapError::StagingCreationFailed { .. } => Stage::Staged,
            SwapError::PrimaryKeyViolation { .. }
            | SwapError::DuplicateRowsViolation { .. }
            | SwapError::EmptyResult { .. } => Stage::Validated,
            SwapError::TargetProvisioningFailed { .. } => Stage::Provisioned,
            SwapError::SwapFailed { .. } => Stage::Swapped,
            SwapError::Storage { stage, .. } => *stage,
        }
    }

    /// Serializable variant tag
    pub fn kind(&self) -> FailureKind {
        match self {
            SwapError::StagingCreationFailed { .. } => FailureKind::StagingCreationFailed,
            SwapError::PrimaryKeyViolation { .. } => FailureKind::PrimaryKeyViolation,
            SwapError::DuplicateRowsViolation { .. } => FailureKind::DuplicateRowsViolation,
            SwapError::EmptyResult { .. } => FailureKind::EmptyResult,
            SwapError::TargetProvisioningFailed { .. } => FailureKind::TargetProvisioningFailed,
            SwapError::SwapFailed { .. } => FailureKind::SwapFailed,
            SwapError::Storage { .. } => FailureKind::Storage,
        }
    }

    /// Whether someone has to look at storage before the next run
    pub fn needs_operator(&self) -> bool {
        matches!(self, SwapError::SwapFailed { .. })
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
