use crate::domain::model::{CommandOutcome, CommandSpec};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{PetriError, Result};
use async_trait::async_trait;
use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use tokio::process::Command;

/// Spawns real processes. Output is inherited so compiler diagnostics and the
/// measurement tool's report reach the caller's terminal unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        let status = command
            .status()
            .await
            .map_err(|source| PetriError::SpawnError {
                program: spec.program.clone(),
                source,
            })?;

        tracing::debug!("{} finished with {}", spec.program, status);

        Ok(CommandOutcome {
            exit_code: status.code(),
            signal: status.signal(),
        })
    }
}
