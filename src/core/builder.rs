use crate::core::profile::{BuildRule, LanguageProfile, RuleOutput, OUT_DIR_TOKEN};
use crate::domain::model::{CommandSpec, Language};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{PetriError, Result};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedSource {
    /// A build rule matched on this marker file.
    Rule(&'static str),
    /// Nothing matched; this placeholder source gets written and compiled.
    Placeholder(&'static str),
}

#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub language: Language,
    pub workspace: PathBuf,
    pub out_dir: PathBuf,
    pub source: DetectedSource,
    pub placeholder: Option<(PathBuf, &'static str)>,
    pub commands: Vec<CommandSpec>,
    pub output: RuleOutput,
    pub artifacts: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub source: DetectedSource,
    pub artifacts: Vec<PathBuf>,
}

/// Build stage of an image: picks the first matching source rule and compiles it.
pub struct Builder<R: CommandRunner> {
    profile: LanguageProfile,
    runner: R,
}

impl<R: CommandRunner> Builder<R> {
    pub fn new(profile: LanguageProfile, runner: R) -> Self {
        Self { profile, runner }
    }

    /// Detects the source and expands the commands. Touches nothing on disk.
    pub fn plan(&self, workspace: &Path, out_dir: &Path) -> Result<BuildPlan> {
        let workspace = absolute(workspace)?;
        let out_dir = absolute(out_dir)?;

        if !workspace.is_dir() {
            return Err(PetriError::ConfigError {
                message: format!("Workspace {} is not a directory", workspace.display()),
            });
        }

        let matched = self
            .profile
            .build_rules
            .iter()
            .find(|rule| workspace.join(rule.marker).exists());

        let (rule, source, placeholder): (&BuildRule, _, _) = match matched {
            Some(rule) => (rule, DetectedSource::Rule(rule.marker), None),
            None => {
                let rule = &self.profile.placeholder.rule;
                (
                    rule,
                    DetectedSource::Placeholder(rule.marker),
                    Some((workspace.join(rule.marker), self.profile.placeholder.contents)),
                )
            }
        };

        let out = out_dir.to_string_lossy();
        let commands = rule
            .commands
            .iter()
            .filter_map(|template| {
                let (program, args) = template.split_first()?;
                Some(
                    CommandSpec::new(*program)
                        .args(args.iter().map(|arg| arg.replace(OUT_DIR_TOKEN, &out)))
                        .current_dir(&workspace)
                        .envs(&self.profile.build_env),
                )
            })
            .collect();

        Ok(BuildPlan {
            language: self.profile.language,
            workspace,
            out_dir,
            source,
            placeholder,
            commands,
            output: rule.output.clone(),
            artifacts: self.profile.artifacts.clone(),
        })
    }

    pub async fn execute(&self, plan: &BuildPlan) -> Result<BuildOutcome> {
        fs::create_dir_all(&plan.out_dir).await?;

        match &plan.source {
            DetectedSource::Rule(marker) => {
                tracing::info!("Building {} project from {}", plan.language.display_name(), marker)
            }
            DetectedSource::Placeholder(file) => {
                tracing::warn!(
                    "No {} source found, creating placeholder {}",
                    plan.language.display_name(),
                    file
                )
            }
        }

        if let Some((path, contents)) = &plan.placeholder {
            fs::write(path, contents).await?;
        }

        for command in &plan.commands {
            tracing::info!("▶ {}", command.display());
            let outcome = self.runner.run(command).await?;
            if !outcome.is_success() {
                return Err(PetriError::BuildFailedError {
                    command: command.display(),
                    exit_code: outcome.exit_code,
                });
            }
        }

        let primary = self.resolve_primary(plan).await?;
        let mut artifacts = Vec::with_capacity(plan.artifacts.len());
        for name in &plan.artifacts {
            let target = plan.out_dir.join(name);
            if target != primary {
                fs::copy(&primary, &target).await?;
            }
            let mut perms = fs::metadata(&target).await?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&target, perms).await?;
            artifacts.push(target);
        }

        tracing::info!("✅ Build produced {} artifact(s)", artifacts.len());
        Ok(BuildOutcome {
            source: plan.source.clone(),
            artifacts,
        })
    }

    pub async fn build(&self, workspace: &Path, out_dir: &Path) -> Result<BuildOutcome> {
        let plan = self.plan(workspace, out_dir)?;
        self.execute(&plan).await
    }

    async fn resolve_primary(&self, plan: &BuildPlan) -> Result<PathBuf> {
        match &plan.output {
            RuleOutput::Artifact(name) => {
                let path = plan.out_dir.join(name);
                if fs::metadata(&path).await.is_err() {
                    return Err(missing(format!(
                        "Build finished but {} was not produced",
                        path.display()
                    )));
                }
                Ok(path)
            }
            RuleOutput::NewestExecutable(dir) => {
                let dir = plan.workspace.join(dir);
                let found = find_build_output(&dir, &plan.artifacts).await?.ok_or_else(|| {
                    missing(format!("No executable file found in {}", dir.display()))
                })?;
                tracing::debug!("Using {} as the build output", found.display());
                Ok(found)
            }
        }
    }
}

/// The binary a Makefile or Cargo build left in `dir`: the newest executable
/// regular file, ties broken by name. Files named like `artifacts` are copies
/// from an earlier build into the same directory and only count when nothing
/// else is executable.
pub async fn find_build_output(dir: &Path, artifacts: &[&str]) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut fresh = Vec::new();
    let mut copies = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let Ok(meta) = fs::metadata(&path).await else {
            continue;
        };
        if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
            continue;
        }

        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let is_copy = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| artifacts.contains(&name));
        if is_copy {
            copies.push((modified, path));
        } else {
            fresh.push((modified, path));
        }
    }

    let mut candidates = if fresh.is_empty() { copies } else { fresh };
    candidates.sort_by(|(a_time, a_path), (b_time, b_path)| {
        b_time.cmp(a_time).then_with(|| a_path.cmp(b_path))
    });
    Ok(candidates.into_iter().next().map(|(_, path)| path))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn missing(message: String) -> PetriError {
    PetriError::IoError(io::Error::new(io::ErrorKind::NotFound, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CommandOutcome;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records every command and fakes the compiler by creating the `-o` target.
    #[derive(Clone, Default)]
    struct FakeCompiler {
        calls: Arc<Mutex<Vec<CommandSpec>>>,
        fail_on: Option<&'static str>,
    }

    impl FakeCompiler {
        fn failing_on(program: &'static str) -> Self {
            Self {
                fail_on: Some(program),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeCompiler {
        async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
            self.calls.lock().unwrap().push(spec.clone());
            if self.fail_on == Some(spec.program.as_str()) {
                return Ok(CommandOutcome::exited(1));
            }
            if let Some(pos) = spec.args.iter().position(|a| a == "-o") {
                std::fs::write(&spec.args[pos + 1], b"\x7fELF")?;
            }
            Ok(CommandOutcome::success())
        }
    }

    fn builder(language: Language, runner: FakeCompiler) -> Builder<FakeCompiler> {
        Builder::new(LanguageProfile::for_language(language), runner)
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let workspace = TempDir::new().unwrap();
        std::fs::write(workspace.path().join("script.go"), "package main").unwrap();
        std::fs::write(workspace.path().join("go.mod"), "module bench").unwrap();

        let builder = builder(Language::Go, FakeCompiler::default());
        let plan = builder.plan(workspace.path(), Path::new("/tmp/out")).unwrap();

        assert_eq!(plan.source, DetectedSource::Rule("go.mod"));
        assert_eq!(plan.commands.len(), 2);
        assert_eq!(plan.commands[0].display(), "go mod download");
        assert_eq!(
            plan.commands[1].display(),
            "go build -ldflags=-s -w -o /tmp/out/program ."
        );
        assert_eq!(plan.commands[1].env.get("CGO_ENABLED").map(String::as_str), Some("0"));
        assert_eq!(plan.commands[1].cwd.as_deref(), Some(workspace.path()));
        assert!(plan.placeholder.is_none());
    }

    #[test]
    fn test_plan_rejects_missing_workspace() {
        let builder = builder(Language::C, FakeCompiler::default());
        let result = builder.plan(Path::new("/definitely/not/here"), Path::new("/tmp/out"));
        assert!(matches!(result, Err(PetriError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn test_c_build_copies_both_artifacts() {
        let workspace = TempDir::new().unwrap();
        std::fs::write(workspace.path().join("benchmark.c"), "int main(){}").unwrap();
        let out = workspace.path().join("out");

        let runner = FakeCompiler::default();
        let outcome = builder(Language::C, runner.clone())
            .build(workspace.path(), &out)
            .await
            .unwrap();

        assert_eq!(outcome.source, DetectedSource::Rule("benchmark.c"));
        assert_eq!(outcome.artifacts, vec![out.join("benchmark"), out.join("program")]);
        for artifact in &outcome.artifacts {
            let mode = std::fs::metadata(artifact).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
        assert_eq!(runner.calls().len(), 1);
        assert_eq!(runner.calls()[0].program, "gcc");
    }

    #[tokio::test]
    async fn test_placeholder_written_when_no_source() {
        let workspace = TempDir::new().unwrap();
        let out = workspace.path().join("out");

        let runner = FakeCompiler::default();
        let outcome = builder(Language::Cpp, runner.clone())
            .build(workspace.path(), &out)
            .await
            .unwrap();

        assert_eq!(outcome.source, DetectedSource::Placeholder("placeholder.cpp"));
        let source = std::fs::read_to_string(workspace.path().join("placeholder.cpp")).unwrap();
        assert!(source.contains("No C++ program found"));
        assert!(runner.calls()[0].args.contains(&"placeholder.cpp".to_string()));
        assert!(out.join("benchmark").exists());
    }

    fn write_executable(path: &Path, contents: &str, age: Duration) {
        std::fs::write(path, contents).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[tokio::test]
    async fn test_makefile_uses_newest_executable() {
        let workspace = TempDir::new().unwrap();
        let dir = workspace.path();
        std::fs::write(dir.join("Makefile"), "all:\n\tcc -o zeta zeta.c\n").unwrap();
        write_executable(&dir.join("alpha"), "alpha", Duration::from_secs(3600));
        write_executable(&dir.join("zeta"), "zeta", Duration::ZERO);
        std::fs::write(dir.join("notes.txt"), "notes").unwrap();
        let out = dir.join("out");

        let outcome = builder(Language::C, FakeCompiler::default())
            .build(dir, &out)
            .await
            .unwrap();

        assert_eq!(outcome.source, DetectedSource::Rule("Makefile"));
        assert_eq!(std::fs::read_to_string(out.join("program")).unwrap(), "zeta");
        assert_eq!(std::fs::read_to_string(out.join("benchmark")).unwrap(), "zeta");
    }

    #[tokio::test]
    async fn test_rebuild_in_place_ignores_previous_artifacts() {
        let workspace = TempDir::new().unwrap();
        let dir = workspace.path();
        std::fs::write(dir.join("Makefile"), "all:\n\tcc -o zeta zeta.c\n").unwrap();
        // left behind by the previous build, newer than the make output
        write_executable(&dir.join("benchmark"), "v1", Duration::ZERO);
        write_executable(&dir.join("program"), "v1", Duration::ZERO);
        write_executable(&dir.join("zeta"), "v2", Duration::from_secs(60));

        builder(Language::C, FakeCompiler::default())
            .build(dir, dir)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(dir.join("program")).unwrap(), "v2");
        assert_eq!(std::fs::read_to_string(dir.join("benchmark")).unwrap(), "v2");
    }

    #[tokio::test]
    async fn test_build_output_named_like_an_artifact() {
        let dir = TempDir::new().unwrap();
        write_executable(&dir.path().join("benchmark"), "stale", Duration::from_secs(3600));
        write_executable(&dir.path().join("program"), "fresh", Duration::ZERO);

        let found = find_build_output(dir.path(), &["benchmark", "program"])
            .await
            .unwrap();
        assert_eq!(found, Some(dir.path().join("program")));
    }

    #[tokio::test]
    async fn test_build_output_ties_break_by_name() {
        let dir = TempDir::new().unwrap();
        let now = SystemTime::now();
        for name in ["zeta", "alpha"] {
            let path = dir.path().join(name);
            write_executable(&path, name, Duration::ZERO);
            let file = std::fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(now).unwrap();
        }

        let found = find_build_output(dir.path(), &[]).await.unwrap();
        assert_eq!(found, Some(dir.path().join("alpha")));
    }

    #[tokio::test]
    async fn test_failed_command_stops_the_build() {
        let workspace = TempDir::new().unwrap();
        std::fs::write(workspace.path().join("go.mod"), "module bench").unwrap();

        let runner = FakeCompiler::failing_on("go");
        let result = builder(Language::Go, runner.clone())
            .build(workspace.path(), &workspace.path().join("out"))
            .await;

        match result {
            Err(PetriError::BuildFailedError { command, exit_code }) => {
                assert_eq!(command, "go mod download");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected result: {:?}", other.map(|o| o.artifacts)),
        }
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_build_output_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(find_build_output(dir.path(), &["program"]).await.unwrap().is_none());
    }
}
