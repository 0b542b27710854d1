//! sf-core - Core library for Swapflow
//!
//! This crate provides relation addressing (including the target to staging
//! naming transform), the validation rules applied to staged data, and
//! `swapflow.yml` configuration parsing.

pub mod config;
pub mod error;
pub mod identifier;
pub mod relation;
pub mod sql_utils;
pub mod validation;

pub use config::{Config, DatabaseConfig, DbType, Dialect, JobConfig};
pub use error::{CoreError, CoreResult};
pub use identifier::{ColumnName, DatabaseName, IdentifierError, SchemaName, TableName};
pub use relation::{RelationRef, STAGING_PREFIX};
pub use validation::{EmptyPolicy, PrimaryKeyConfig, ValidationSpec};
