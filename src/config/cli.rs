use crate::config::toml_config::{validate_measure_command, TomlConfig};
use crate::config::{BuildArgs, EntrypointArgs, RunArgs, UsageArgs};
use crate::core::entrypoint::default_measure_command;
use crate::domain::model::{Language, WorkloadKind, WorkloadParams};
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use std::path::PathBuf;

pub const DEFAULT_ENTRYPOINT_WORKSPACE: &str = "/workspace";
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// `run` settings after CLI flags are layered over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub kind: WorkloadKind,
    pub params: WorkloadParams,
    pub monitor: bool,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub language: Language,
    pub workspace: PathBuf,
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub language: Language,
    pub workspace: PathBuf,
    pub bin_dir: PathBuf,
    pub measure_command: Vec<String>,
}

impl RunArgs {
    pub fn resolve(&self, file: &TomlConfig) -> Result<RunSettings> {
        let kind = match &self.workload {
            Some(kind) => kind.parse()?,
            None => file.workload_kind()?.unwrap_or_default(),
        };

        let base = file.workload_params();
        let params = WorkloadParams {
            fibonacci_terms: self.fibonacci_terms.unwrap_or(base.fibonacci_terms),
            prime_limit: self.prime_limit.unwrap_or(base.prime_limit),
            entries: self.entries.unwrap_or(base.entries),
            entry_width: self.entry_width.unwrap_or(base.entry_width),
            fizzbuzz_limit: self.fizzbuzz_limit.unwrap_or(base.fizzbuzz_limit),
        };

        let settings = RunSettings {
            kind,
            params,
            monitor: self.monitor || file.monitoring_enabled(),
            json: self.json,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        self.params.validate()
    }
}

impl BuildArgs {
    pub fn resolve(&self, file: &TomlConfig) -> Result<BuildSettings> {
        let language = resolve_language(self.language.as_deref(), file)?;
        let workspace = self
            .workspace
            .as_deref()
            .or(file.workspace())
            .unwrap_or(".")
            .to_string();
        let out_dir = self
            .out_dir
            .as_deref()
            .or(file.out_dir())
            .unwrap_or(&workspace)
            .to_string();

        let settings = BuildSettings {
            language,
            workspace: PathBuf::from(workspace),
            out_dir: PathBuf::from(out_dir),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for BuildSettings {
    fn validate(&self) -> Result<()> {
        validate_path("workspace", &self.workspace.to_string_lossy())?;
        validate_path("out_dir", &self.out_dir.to_string_lossy())
    }
}

impl EntrypointArgs {
    pub fn resolve(&self, file: &TomlConfig) -> Result<RuntimeSettings> {
        let language = resolve_language(self.language.as_deref(), file)?;
        let workspace = self
            .workspace
            .as_deref()
            .or(file.workspace())
            .unwrap_or(DEFAULT_ENTRYPOINT_WORKSPACE);
        let bin_dir = self
            .bin_dir
            .as_deref()
            .or(file.bin_dir())
            .unwrap_or(DEFAULT_BIN_DIR);
        let measure_command = if self.no_measure {
            Vec::new()
        } else {
            file.measure_command()
                .map(<[String]>::to_vec)
                .unwrap_or_else(default_measure_command)
        };

        let settings = RuntimeSettings {
            language,
            workspace: PathBuf::from(workspace),
            bin_dir: PathBuf::from(bin_dir),
            measure_command,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for RuntimeSettings {
    fn validate(&self) -> Result<()> {
        validate_path("workspace", &self.workspace.to_string_lossy())?;
        validate_path("bin_dir", &self.bin_dir.to_string_lossy())?;
        validate_measure_command(&self.measure_command)
    }
}

impl UsageArgs {
    pub fn resolve(&self, file: &TomlConfig) -> Result<Language> {
        resolve_language(self.language.as_deref(), file)
    }
}

/// `--language` wins over `runtime.language`; one of them is required.
fn resolve_language(flag: Option<&str>, file: &TomlConfig) -> Result<Language> {
    let from_file = file.language()?;
    let language = match flag {
        Some(value) => Some(value.parse::<Language>()?),
        None => from_file,
    };
    validate_required_field("language", &language).copied()
}
