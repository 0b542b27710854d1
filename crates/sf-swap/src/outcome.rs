//! Structured result of one run

use crate::error::{ErrorCategory, FailureKind, SwapError};
use crate::stage::Stage;
use serde::Serialize;
use sf_check::ValidationResult;

/// Serializable summary of a [`SwapError`]
#[derive(Debug, Clone, Serialize)]
pub struct FailureDetail {
    pub kind: FailureKind,
    pub category: ErrorCategory,
    /// Stage the run failed to reach
    pub stage: Stage,
    pub message: String,
    /// Storage must be inspected before the next run
    pub needs_operator: bool,
}

impl From<&SwapError> for FailureDetail {
    fn from(err: &SwapError) -> Self {
        Self {
            kind: err.kind(),
            category: err.category(),
            stage: err.stage(),
            message: err.to_string(),
            needs_operator: err.needs_operator(),
        }
    }
}

/// What happened during one run, in the shape the CLI prints and persists
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub job: String,
    pub target: String,
    pub staging: String,
    pub success: bool,
    /// Last stage reached
    pub stage: Stage,
    pub completed_stages: Vec<Stage>,
    /// The target did not exist and was created by this run
    pub target_created: bool,
    pub staged_rows: Option<u64>,
    pub validation: Option<ValidationResult>,
    pub warnings: Vec<String>,
    pub error: Option<FailureDetail>,
    pub duration_ms: u64,
}

impl OperationOutcome {
    pub fn category(&self) -> Option<ErrorCategory> {
        self.error.as_ref().map(|e| e.category)
    }
}

/// Accumulates run state as stages complete
#[derive(Debug)]
pub(crate) struct Progress {
    pub(crate) stage: Stage,
    pub(crate) completed: Vec<Stage>,
    pub(crate) target_created: bool,
    pub(crate) validation: Option<ValidationResult>,
    pub(crate) warnings: Vec<String>,
}

impl Progress {
    pub(crate) fn new() -> Self {
        Self {
            stage: Stage::Start,
            completed: Vec::new(),
            target_created: false,
            validation: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        debug_assert_eq!(self.stage.next(), Some(stage));
        log::info!("Stage {} -> {}", self.stage, stage);
        self.stage = stage;
        self.completed.push(stage);
    }

    pub(crate) fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    pub(crate) fn staged_rows(&self) -> Option<u64> {
        match self.validation {
            Some(ValidationResult::Pass { total_rows }) => Some(total_rows),
            Some(ValidationResult::DuplicateRowsViolation { total, .. }) => Some(total),
            Some(ValidationResult::EmptyResult) => Some(0),
            _ => None,
        }
    }
}
