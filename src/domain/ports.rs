use crate::domain::model::{CommandOutcome, CommandSpec, WorkloadKind, WorkloadReport};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A benchmark program body. Runs synchronously on the calling thread.
pub trait Workload: Send + Sync {
    fn kind(&self) -> WorkloadKind;
    fn run(&self) -> Result<WorkloadReport>;
}

/// Spawns one child process at a time and waits for it.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome>;
}
