//! sf-check - Integrity checks for Swapflow
//!
//! This crate generates the check SQL for a staged relation and runs it
//! through the storage executor to produce a `ValidationResult`.

pub mod generator;
pub mod validator;

pub use generator::{plan_checks, CheckKind, GeneratedCheck};
pub use validator::{IntegrityValidator, RowCounts, ValidationResult, ValidationStatus};
