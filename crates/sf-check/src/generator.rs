//! Check SQL generation

use sf_core::{ColumnName, RelationRef, ValidationSpec};
use std::fmt;

/// Which integrity check a generated query implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Largest primary-key group
    PrimaryKey,
    /// Total row count
    TotalRows,
    /// Distinct full-row count
    DistinctRows,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::PrimaryKey => write!(f, "primary_key"),
            CheckKind::TotalRows => write!(f, "total_rows"),
            CheckKind::DistinctRows => write!(f, "distinct_rows"),
        }
    }
}

/// A check query ready for execution
#[derive(Debug, Clone)]
pub struct GeneratedCheck {
    /// Check implemented by `sql`
    pub kind: CheckKind,

    /// Query to run. `TotalRows` and `DistinctRows` are row sources meant
    /// for `Database::query_count`; `PrimaryKey` is meant for `query_one`.
    pub sql: String,
}

/// Generate SQL for the primary-key check.
///
/// Returns at most one row: the largest key group, with the count first and
/// every column cast to text so the storage layer can hand it back verbatim.
pub fn generate_primary_key_check(relation: &RelationRef, columns: &[ColumnName]) -> String {
    let quoted: Vec<String> = columns.iter().map(ColumnName::quoted).collect();
    let key_text: Vec<String> = quoted
        .iter()
        .map(|c| format!("CAST({} AS VARCHAR)", c))
        .collect();
    format!(
        "SELECT CAST(COUNT(*) AS VARCHAR) AS cnt, {}\nFROM {}\nGROUP BY {}\nORDER BY COUNT(*) DESC\nLIMIT 1",
        key_text.join(", "),
        relation.quoted(),
        quoted.join(", ")
    )
}

/// Row source for the total row count
pub fn generate_total_rows(relation: &RelationRef) -> String {
    format!("SELECT * FROM {}", relation.quoted())
}

/// Row source for the distinct full-row count
pub fn generate_distinct_rows(relation: &RelationRef) -> String {
    format!("SELECT DISTINCT * FROM {}", relation.quoted())
}

/// Every check `spec` requires against `relation`, in execution order.
pub fn plan_checks(relation: &RelationRef, spec: &ValidationSpec) -> Vec<GeneratedCheck> {
    let mut checks = Vec::with_capacity(3);
    if let Some(columns) = spec.primary_key() {
        checks.push(GeneratedCheck {
            kind: CheckKind::PrimaryKey,
            sql: generate_primary_key_check(relation, columns),
        });
    }
    if spec.requires_no_duplicate_rows() {
        checks.push(GeneratedCheck {
            kind: CheckKind::TotalRows,
            sql: generate_total_rows(relation),
        });
        checks.push(GeneratedCheck {
            kind: CheckKind::DistinctRows,
            sql: generate_distinct_rows(relation),
        });
    }
    checks
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
