use crate::core::profile::{LanguageProfile, RuntimeRule};
use crate::domain::model::CommandSpec;
use crate::domain::ports::CommandRunner;
use crate::utils::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SOURCE_NOTE: &str =
    "Note: Source files detected. For compilation, rebuild the image with source code.";
pub const RUNNING_NOTE: &str = "Running pre-compiled program:";

pub fn default_measure_command() -> Vec<String> {
    vec!["/usr/bin/time".to_string(), "-v".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Run the program under the measurement command. `note` prints the
    /// "source files detected" hint first.
    Run { program: PathBuf, note: bool },
    Usage,
}

/// Runtime stage of an image: runs the compiled program or prints usage help.
pub struct Entrypoint<R: CommandRunner> {
    profile: LanguageProfile,
    runner: R,
    measure_command: Vec<String>,
}

impl<R: CommandRunner> Entrypoint<R> {
    pub fn new(profile: LanguageProfile, runner: R) -> Self {
        Self {
            profile,
            runner,
            measure_command: default_measure_command(),
        }
    }

    /// An empty command runs the program unwrapped.
    pub fn with_measure_command(mut self, command: Vec<String>) -> Self {
        self.measure_command = command;
        self
    }

    pub fn decide(&self, workspace: &Path, bin_dir: &Path) -> Dispatch {
        match &self.profile.runtime {
            RuntimeRule::SourceMarkers { markers, program } => {
                if markers.iter().any(|m| workspace.join(m).exists()) {
                    Dispatch::Run {
                        program: bin_dir.join(program),
                        note: true,
                    }
                } else {
                    Dispatch::Usage
                }
            }
            RuntimeRule::BinaryCandidates(candidates) => candidates
                .iter()
                .map(|c| bin_dir.join(c))
                .find(|path| path.is_file())
                .map(|program| Dispatch::Run {
                    program,
                    note: false,
                })
                .unwrap_or(Dispatch::Usage),
        }
    }

    /// Returns the exit code the entrypoint should terminate with.
    pub async fn execute<O: Write + Send>(&self, dispatch: &Dispatch, out: &mut O) -> Result<i32> {
        match dispatch {
            Dispatch::Usage => {
                for line in &self.profile.banner {
                    writeln!(out, "{}", line)?;
                }
                out.flush()?;
                Ok(0)
            }
            Dispatch::Run { program, note } => {
                if *note {
                    writeln!(out, "{}", SOURCE_NOTE)?;
                    writeln!(out, "{}", RUNNING_NOTE)?;
                }
                // the child shares stdout
                out.flush()?;

                let spec = self.command_for(program);
                tracing::debug!("Running {}", spec.display());
                let outcome = self.runner.run(&spec).await?;

                let code = match (outcome.exit_code, outcome.signal) {
                    (Some(code), _) => code,
                    (None, Some(signal)) => 128 + signal,
                    (None, None) => 1,
                };
                if code != 0 {
                    tracing::warn!("{} exited with code {}", spec.display(), code);
                }
                Ok(code)
            }
        }
    }

    pub async fn run<O: Write + Send>(&self, workspace: &Path, bin_dir: &Path, out: &mut O) -> Result<i32> {
        let dispatch = self.decide(workspace, bin_dir);
        self.execute(&dispatch, out).await
    }

    fn command_for(&self, program: &Path) -> CommandSpec {
        let program = program.to_string_lossy().into_owned();
        match self.measure_command.split_first() {
            Some((tool, args)) => CommandSpec::new(tool.clone()).args(args.iter().cloned()).arg(program),
            None => CommandSpec::new(program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CommandOutcome, Language};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone)]
    struct RecordingRunner {
        calls: Arc<Mutex<Vec<CommandSpec>>>,
        outcome: CommandOutcome,
    }

    impl RecordingRunner {
        fn returning(outcome: CommandOutcome) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                outcome,
            }
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
            self.calls.lock().unwrap().push(spec.clone());
            Ok(self.outcome)
        }
    }

    fn entrypoint(language: Language, runner: RecordingRunner) -> Entrypoint<RecordingRunner> {
        Entrypoint::new(LanguageProfile::for_language(language), runner)
    }

    #[test]
    fn test_go_without_sources_shows_usage() {
        let workspace = TempDir::new().unwrap();
        let bin_dir = TempDir::new().unwrap();
        std::fs::write(bin_dir.path().join("program"), "").unwrap();

        let ep = entrypoint(Language::Go, RecordingRunner::returning(CommandOutcome::success()));
        assert_eq!(ep.decide(workspace.path(), bin_dir.path()), Dispatch::Usage);
    }

    #[test]
    fn test_go_with_sources_runs_program() {
        let workspace = TempDir::new().unwrap();
        std::fs::write(workspace.path().join("benchmark.go"), "package main").unwrap();

        let ep = entrypoint(Language::Go, RecordingRunner::returning(CommandOutcome::success()));
        assert_eq!(
            ep.decide(workspace.path(), Path::new("/usr/local/bin")),
            Dispatch::Run {
                program: PathBuf::from("/usr/local/bin/program"),
                note: true
            }
        );
    }

    #[test]
    fn test_c_prefers_benchmark_binary() {
        let workspace = TempDir::new().unwrap();
        let bin_dir = TempDir::new().unwrap();
        std::fs::write(bin_dir.path().join("program"), "").unwrap();

        let ep = entrypoint(Language::C, RecordingRunner::returning(CommandOutcome::success()));
        assert_eq!(
            ep.decide(workspace.path(), bin_dir.path()),
            Dispatch::Run {
                program: bin_dir.path().join("program"),
                note: false
            }
        );

        std::fs::write(bin_dir.path().join("benchmark"), "").unwrap();
        assert_eq!(
            ep.decide(workspace.path(), bin_dir.path()),
            Dispatch::Run {
                program: bin_dir.path().join("benchmark"),
                note: false
            }
        );
    }

    #[tokio::test]
    async fn test_run_wraps_program_in_measure_command() {
        let runner = RecordingRunner::returning(CommandOutcome::exited(3));
        let ep = entrypoint(Language::Go, runner.clone());
        let dispatch = Dispatch::Run {
            program: PathBuf::from("/usr/local/bin/program"),
            note: true,
        };

        let mut out = Vec::new();
        let code = ep.execute(&dispatch, &mut out).await.unwrap();

        assert_eq!(code, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{}\n{}\n", SOURCE_NOTE, RUNNING_NOTE)
        );
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].display(), "/usr/bin/time -v /usr/local/bin/program");
    }

    #[tokio::test]
    async fn test_empty_measure_command_runs_directly() {
        let runner = RecordingRunner::returning(CommandOutcome {
            exit_code: None,
            signal: Some(9),
        });
        let ep = entrypoint(Language::C, runner.clone()).with_measure_command(vec![]);
        let dispatch = Dispatch::Run {
            program: PathBuf::from("/usr/local/bin/benchmark"),
            note: false,
        };

        let mut out = Vec::new();
        let code = ep.execute(&dispatch, &mut out).await.unwrap();

        assert_eq!(code, 137);
        assert!(out.is_empty());
        assert_eq!(runner.calls.lock().unwrap()[0].program, "/usr/local/bin/benchmark");
    }

    #[tokio::test]
    async fn test_usage_prints_banner() {
        let runner = RecordingRunner::returning(CommandOutcome::success());
        let ep = entrypoint(Language::Cpp, runner.clone());

        let mut out = Vec::new();
        let code = ep.execute(&Dispatch::Usage, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, 0);
        assert!(text.starts_with("PetriBench C++ Runtime (Multi-stage Optimized)\n"));
        assert!(text.contains("docker build -f Dockerfile.cpp -t petribench-cpp ."));
        assert!(runner.calls.lock().unwrap().is_empty());
    }
}
