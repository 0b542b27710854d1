//! A single validated-swap request

use sf_core::{ColumnName, CoreResult, JobConfig, RelationRef, ValidationSpec};
use std::path::Path;

/// Everything one run needs: where to publish, what to publish, and the
/// rules the staged rows must satisfy first.
#[derive(Debug, Clone)]
pub struct SwapJob {
    /// Name used in logs and outcomes
    pub name: String,

    /// Relation whose contents are replaced
    pub target: RelationRef,

    /// Query producing the new contents
    pub select_sql: String,

    /// Checks applied to the staged rows
    pub validation: ValidationSpec,

    /// Statements executed before staging
    pub pre_hook: Vec<String>,
}

impl SwapJob {
    /// Job with only the mandatory duplicate-row check, named after the
    /// target table
    pub fn new(target: RelationRef, select_sql: impl Into<String>) -> Self {
        Self {
            name: target.name.to_string(),
            target,
            select_sql: select_sql.into(),
            validation: ValidationSpec::new(),
            pre_hook: Vec::new(),
        }
    }

    /// Build a job from its `swapflow.yml` entry, reading `sql_file`
    /// relative to `root`
    pub fn from_config(config: &JobConfig, root: &Path) -> CoreResult<Self> {
        Ok(Self {
            name: config.name().to_string(),
            target: config.target(),
            select_sql: config.resolve_sql(root)?,
            validation: config.validation_spec(),
            pre_hook: config.pre_hook.clone(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Require the given columns to be unique across staged rows
    pub fn with_primary_key(mut self, columns: Vec<ColumnName>) -> Self {
        self.validation = self.validation.with_primary_key(columns);
        self
    }

    pub fn with_validation(mut self, validation: ValidationSpec) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_pre_hook(mut self, statements: Vec<String>) -> Self {
        self.pre_hook = statements;
        self
    }

    /// Relation the staging builder materializes into
    pub fn staging(&self) -> RelationRef {
        self.target.staging()
    }
}

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;
