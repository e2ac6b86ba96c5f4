pub mod builder;
pub mod engine;
pub mod entrypoint;
pub mod fizzbuzz;
pub mod profile;
pub mod workload;

pub use crate::domain::model::{RunSummary, WorkloadParams, WorkloadReport};
pub use crate::domain::ports::{CommandRunner, Workload};
pub use crate::utils::error::Result;
