//! Integrity validation of a staged relation

use crate::generator::{
    generate_distinct_rows, generate_primary_key_check, generate_total_rows,
};
use sf_core::{ColumnName, EmptyPolicy, RelationRef, ValidationSpec};
use sf_db::{Database, DbError, DbResult};
use serde::Serialize;
use std::fmt;

/// Outcome of validating a staged relation.
///
/// Violations carry the evidence that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    /// Every check passed
    Pass {
        /// Rows in the staged relation
        total_rows: u64,
    },

    /// At least two rows share a primary key
    PrimaryKeyViolation {
        /// Key columns, in declaration order
        columns: Vec<String>,
        /// Key values of the largest group as text (`None` for NULL)
        key: Vec<Option<String>>,
        /// Rows sharing that key
        count: u64,
    },

    /// At least two rows are identical across every column
    DuplicateRowsViolation {
        /// Total rows
        total: u64,
        /// Distinct rows
        distinct: u64,
    },

    /// The staged relation is empty and the policy rejects empty loads
    EmptyResult,
}

/// Status tag of a [`ValidationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,
    PrimaryKeyViolation,
    DuplicateRowsViolation,
    EmptyResult,
}

impl ValidationResult {
    /// Status tag without the evidence
    pub fn status(&self) -> ValidationStatus {
        match self {
            ValidationResult::Pass { .. } => ValidationStatus::Pass,
            ValidationResult::PrimaryKeyViolation { .. } => ValidationStatus::PrimaryKeyViolation,
            ValidationResult::DuplicateRowsViolation { .. } => {
                ValidationStatus::DuplicateRowsViolation
            }
            ValidationResult::EmptyResult => ValidationStatus::EmptyResult,
        }
    }

    /// Whether the staged relation may be published
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationResult::Pass { .. })
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationResult::Pass { total_rows } => write!(f, "pass ({} rows)", total_rows),
            ValidationResult::PrimaryKeyViolation {
                columns,
                key,
                count,
            } => {
                let values: Vec<&str> = key
                    .iter()
                    .map(|v| v.as_deref().unwrap_or("NULL"))
                    .collect();
                write!(
                    f,
                    "primary key ({}) = ({}) appears {} times",
                    columns.join(", "),
                    values.join(", "),
                    count
                )
            }
            ValidationResult::DuplicateRowsViolation { total, distinct } => write!(
                f,
                "{} duplicate rows (total {}, distinct {})",
                total.saturating_sub(*distinct),
                total,
                distinct
            ),
            ValidationResult::EmptyResult => write!(f, "query returned no rows"),
        }
    }
}

/// Total and distinct full-row counts of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub total: u64,
    pub distinct: u64,
}

impl RowCounts {
    /// Whether any row appears more than once
    pub fn has_duplicates(&self) -> bool {
        self.total != self.distinct
    }
}

/// Runs the integrity checks of a [`ValidationSpec`] against a staged relation.
///
/// Storage faults are returned as `Err`; rule violations are returned as
/// `Ok` with a non-pass [`ValidationResult`].
pub struct IntegrityValidator<'a> {
    db: &'a dyn Database,
}

impl<'a> IntegrityValidator<'a> {
    /// Create a new validator
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Find the largest primary-key group.
    ///
    /// Returns `None` when the relation is empty, otherwise the key values
    /// and the group size. Which group wins a tie does not matter; only the
    /// count is used to decide.
    pub async fn largest_key_group(
        &self,
        relation: &RelationRef,
        columns: &[ColumnName],
    ) -> DbResult<Option<(Vec<Option<String>>, u64)>> {
        let sql = generate_primary_key_check(relation, columns);
        let Some(mut row) = self.db.query_one(&sql).await? else {
            return Ok(None);
        };

        if row.len() != columns.len() + 1 {
            return Err(DbError::UnexpectedResult(format!(
                "primary key check returned {} columns, expected {}",
                row.len(),
                columns.len() + 1
            )));
        }

        let count_text = row.remove(0).unwrap_or_default();
        let count = count_text.parse::<u64>().map_err(|_| {
            DbError::UnexpectedResult(format!("primary key count '{}' is not a number", count_text))
        })?;
        Ok(Some((row, count)))
    }

    /// Count total and distinct rows
    pub async fn row_counts(&self, relation: &RelationRef) -> DbResult<RowCounts> {
        let total = self.db.query_count(&generate_total_rows(relation)).await?;
        log::info!("Total row count in {}: {}", relation, total);
        let distinct = self
            .db
            .query_count(&generate_distinct_rows(relation))
            .await?;
        log::info!("Distinct row count in {}: {}", relation, distinct);
        Ok(RowCounts { total, distinct })
    }

    /// Run every check in `spec` and return the first violation, or `Pass`.
    ///
    /// The primary-key check (if any) runs before the duplicate-row check.
    pub async fn validate(
        &self,
        relation: &RelationRef,
        spec: &ValidationSpec,
    ) -> DbResult<ValidationResult> {
        if let Some(columns) = spec.primary_key() {
            match self.largest_key_group(relation, columns).await? {
                None => log::info!("No primary key groups found in {}", relation),
                Some((key, count)) if count > 1 => {
                    let result = ValidationResult::PrimaryKeyViolation {
                        columns: columns.iter().map(|c| c.to_string()).collect(),
                        key,
                        count,
                    };
                    log::error!("Primary key uniqueness failed in {}: {}", relation, result);
                    return Ok(result);
                }
                Some((_, count)) => {
                    log::info!("Primary key check passed in {} (max group {})", relation, count)
                }
            }
        }

        let counts = self.row_counts(relation).await?;
        if spec.requires_no_duplicate_rows() && counts.has_duplicates() {
            let result = ValidationResult::DuplicateRowsViolation {
                total: counts.total,
                distinct: counts.distinct,
            };
            log::error!("Duplicate rows found in {}: {}", relation, result);
            return Ok(result);
        }
        log::info!("No duplicates found in {}", relation);

        if counts.total == 0 && spec.on_empty() == EmptyPolicy::Fail {
            log::error!("Staged relation {} is empty", relation);
            return Ok(ValidationResult::EmptyResult);
        }

        Ok(ValidationResult::Pass {
            total_rows: counts.total,
        })
    }
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
