//! Relation addressing and the staging naming transform.

use crate::error::{CoreError, CoreResult};
use crate::identifier::{DatabaseName, SchemaName, TableName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix that turns a target table name into its staging table name.
pub const STAGING_PREFIX: &str = "temp_";

/// Suffix of the placeholder name a table holds for the duration of a swap.
pub const SWAP_PLACEHOLDER_SUFFIX: &str = "__sf_swap";

/// Fully-qualified address of a single table: `(database, schema, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationRef {
    /// Database (catalog)
    pub database: DatabaseName,

    /// Schema inside the database
    pub schema: SchemaName,

    /// Table name inside the schema
    pub name: TableName,
}

impl RelationRef {
    /// Build a relation from already-validated parts.
    pub fn new(database: DatabaseName, schema: SchemaName, name: TableName) -> Self {
        Self {
            database,
            schema,
            name,
        }
    }

    /// Build a relation from raw strings, validating each part.
    pub fn from_parts(database: &str, schema: &str, name: &str) -> CoreResult<Self> {
        let invalid = |part: &str, e: crate::identifier::IdentifierError| {
            CoreError::InvalidRelation {
                input: format!("{}.{}.{}", database, schema, name),
                reason: format!("{} {}", part, e),
            }
        };
        Ok(Self {
            database: DatabaseName::try_new(database).map_err(|e| invalid("database", e))?,
            schema: SchemaName::try_new(schema).map_err(|e| invalid("schema", e))?,
            name: TableName::try_new(name).map_err(|e| invalid("table", e))?,
        })
    }

    /// The staging relation for this target: same database and schema, name
    /// prefixed with [`STAGING_PREFIX`].
    pub fn staging(&self) -> RelationRef {
        self.with_name(format!("{}{}", STAGING_PREFIX, self.name))
    }

    /// The name this relation is parked under while a swap is in flight.
    pub fn swap_placeholder(&self) -> RelationRef {
        self.with_name(format!("{}{}", self.name, SWAP_PLACEHOLDER_SUFFIX))
    }

    /// Whether the table name carries the staging prefix.
    pub fn is_staging(&self) -> bool {
        self.name.starts_with(STAGING_PREFIX)
    }

    /// Whether both relations live in the same database and schema.
    pub fn same_namespace(&self, other: &RelationRef) -> bool {
        self.database == other.database && self.schema == other.schema
    }

    /// Render as `"database"."schema"."name"`.
    pub fn quoted(&self) -> String {
        format!(
            "{}.{}.{}",
            self.database.quoted(),
            self.schema.quoted(),
            self.name.quoted()
        )
    }

    fn with_name(&self, name: String) -> RelationRef {
        // Prefixing or suffixing a non-empty, NUL-free name keeps the invariant.
        let name = TableName::try_new(name).unwrap_or_else(|_| self.name.clone());
        RelationRef {
            database: self.database.clone(),
            schema: self.schema.clone(),
            name,
        }
    }
}

impl fmt::Display for RelationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.name)
    }
}

impl FromStr for RelationRef {
    type Err = CoreError;

    /// Parse `database.schema.table`. Exactly three dot-separated parts are required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [database, schema, name] => Self::from_parts(database, schema, name),
            _ => Err(CoreError::InvalidRelation {
                input: s.to_string(),
                reason: "expected database.schema.table".to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "relation_test.rs"]
mod tests;
