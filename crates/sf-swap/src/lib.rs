//! sf-swap - Validated CTAS-and-swap orchestration for Swapflow
//!
//! A run moves through four stages in strict order:
//!
//! 1. the staging builder materializes the job's query into `temp_<table>`;
//! 2. the integrity validator checks primary-key uniqueness and full-row
//!    duplicates on the staged rows;
//! 3. the target provisioner creates the target with the staged shape if it
//!    does not exist yet;
//! 4. the atomic swapper exchanges target and staging in one storage
//!    operation.
//!
//! Any failure stops the run. The target is only ever touched by the last
//! stage, and the staging relation is left in place for inspection.

pub mod error;
pub mod job;
pub mod operation;
pub mod outcome;
pub mod provision;
pub mod stage;
pub mod staging;
pub mod swap;

pub use error::{ErrorCategory, FailureKind, SwapError};
pub use job::SwapJob;
pub use operation::SwapOperation;
pub use outcome::{FailureDetail, OperationOutcome};
pub use provision::TargetProvisioner;
pub use stage::Stage;
pub use staging::StagingBuilder;
pub use swap::AtomicSwapper;
