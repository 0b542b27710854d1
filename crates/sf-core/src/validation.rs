//! Validation rules applied to a staged relation before it is published.

use crate::identifier::ColumnName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when the staged relation holds zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Publish the empty table without comment
    Allow,
    /// Publish the empty table and record a warning (default)
    #[default]
    Warn,
    /// Treat an empty load as a data-quality failure
    Fail,
}

impl fmt::Display for EmptyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyPolicy::Allow => write!(f, "allow"),
            EmptyPolicy::Warn => write!(f, "warn"),
            EmptyPolicy::Fail => write!(f, "fail"),
        }
    }
}

/// Primary key as written in YAML: a single column or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKeyConfig {
    /// `primary_key: id`
    Single(ColumnName),
    /// `primary_key: [tenant_id, id]`
    Composite(Vec<ColumnName>),
}

impl PrimaryKeyConfig {
    /// Key columns in declaration order.
    pub fn columns(&self) -> Vec<ColumnName> {
        match self {
            PrimaryKeyConfig::Single(column) => vec![column.clone()],
            PrimaryKeyConfig::Composite(columns) => columns.clone(),
        }
    }
}

/// Checks the Integrity Validator runs against a staged relation.
///
/// The full-row duplicate check cannot be turned off; only the primary-key
/// check is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationSpec {
    primary_key: Option<Vec<ColumnName>>,
    on_empty: EmptyPolicy,
}

impl ValidationSpec {
    /// Spec with only the mandatory duplicate-row check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primary-key uniqueness check over `columns`.
    ///
    /// An empty column list is treated as "no primary key".
    pub fn with_primary_key(mut self, columns: Vec<ColumnName>) -> Self {
        self.primary_key = if columns.is_empty() {
            None
        } else {
            Some(columns)
        };
        self
    }

    /// Set the empty-result policy.
    pub fn with_on_empty(mut self, on_empty: EmptyPolicy) -> Self {
        self.on_empty = on_empty;
        self
    }

    /// Primary-key columns, if a uniqueness check was requested.
    pub fn primary_key(&self) -> Option<&[ColumnName]> {
        self.primary_key.as_deref()
    }

    /// Always `true`: the full-row duplicate check is never skipped.
    pub fn requires_no_duplicate_rows(&self) -> bool {
        true
    }

    /// Policy for a staged relation with zero rows.
    pub fn on_empty(&self) -> EmptyPolicy {
        self.on_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_single_from_yaml() {
        let pk: PrimaryKeyConfig = serde_yaml::from_str("sessionId").unwrap();
        assert_eq!(pk.columns().len(), 1);
        assert_eq!(pk.columns()[0], "sessionId");
    }

    #[test]
    fn test_primary_key_composite_from_yaml() {
        let pk: PrimaryKeyConfig = serde_yaml::from_str("[tenant_id, id]").unwrap();
        let cols = pk.columns();
        assert_eq!(cols[0], "tenant_id");
        assert_eq!(cols[1], "id");
    }

    #[test]
    fn test_spec_without_key_still_checks_duplicates() {
        let spec = ValidationSpec::new();
        assert!(spec.primary_key().is_none());
        assert!(spec.requires_no_duplicate_rows());
        assert_eq!(spec.on_empty(), EmptyPolicy::Warn);
    }

    #[test]
    fn test_empty_key_list_means_no_key() {
        let spec = ValidationSpec::new().with_primary_key(Vec::new());
        assert!(spec.primary_key().is_none());
    }

    #[test]
    fn test_on_empty_parses_lowercase() {
        let policy: EmptyPolicy = serde_yaml::from_str("fail").unwrap();
        assert_eq!(policy, EmptyPolicy::Fail);
    }
}
