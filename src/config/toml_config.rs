use crate::domain::model::{Language, WorkloadKind, WorkloadParams};
use crate::utils::error::{PetriError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "petribench.toml";

pub const MAX_ENTRIES: usize = 10_000_000;
pub const MAX_ENTRY_WIDTH: usize = 100_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub workload: Option<WorkloadConfig>,
    pub runtime: Option<RuntimeConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkloadConfig {
    pub kind: Option<String>,
    pub fibonacci_terms: Option<usize>,
    pub prime_limit: Option<usize>,
    pub entries: Option<usize>,
    pub entry_width: Option<usize>,
    pub fizzbuzz_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub language: Option<String>,
    pub workspace: Option<String>,
    pub bin_dir: Option<String>,
    pub out_dir: Option<String>,
    pub measure_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PetriError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses `content`, resolving `${VAR}` placeholders through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_env_vars(content, lookup)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Loads `path` when given (it must exist); otherwise the default file when
    /// present, otherwise an empty configuration.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!("Loading {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${PETRI_LANGUAGE})；未設定的變數保持原樣
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PetriError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得工作負載參數 (未設定者使用預設值)
    pub fn workload_params(&self) -> WorkloadParams {
        let defaults = WorkloadParams::default();
        let Some(w) = &self.workload else {
            return defaults;
        };
        WorkloadParams {
            fibonacci_terms: w.fibonacci_terms.unwrap_or(defaults.fibonacci_terms),
            prime_limit: w.prime_limit.unwrap_or(defaults.prime_limit),
            entries: w.entries.unwrap_or(defaults.entries),
            entry_width: w.entry_width.unwrap_or(defaults.entry_width),
            fizzbuzz_limit: w.fizzbuzz_limit.unwrap_or(defaults.fizzbuzz_limit),
        }
    }

    pub fn workload_kind(&self) -> Result<Option<WorkloadKind>> {
        self.workload
            .as_ref()
            .and_then(|w| w.kind.as_deref())
            .map(str::parse::<WorkloadKind>)
            .transpose()
    }

    pub fn language(&self) -> Result<Option<Language>> {
        self.runtime()
            .and_then(|r| r.language.as_deref())
            .map(str::parse::<Language>)
            .transpose()
    }

    pub fn workspace(&self) -> Option<&str> {
        self.runtime().and_then(|r| r.workspace.as_deref())
    }

    pub fn bin_dir(&self) -> Option<&str> {
        self.runtime().and_then(|r| r.bin_dir.as_deref())
    }

    pub fn out_dir(&self) -> Option<&str> {
        self.runtime().and_then(|r| r.out_dir.as_deref())
    }

    pub fn measure_command(&self) -> Option<&[String]> {
        self.runtime().and_then(|r| r.measure_command.as_deref())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    fn runtime(&self) -> Option<&RuntimeConfig> {
        self.runtime.as_ref()
    }
}

impl Validate for WorkloadParams {
    fn validate(&self) -> Result<()> {
        validation::validate_range(
            "workload.fibonacci_terms",
            self.fibonacci_terms,
            2,
            crate::core::workload::MAX_FIBONACCI_TERMS,
        )?;
        validation::validate_range("workload.prime_limit", self.prime_limit, 0, 100_000_000)?;
        validation::validate_range("workload.entries", self.entries, 1, MAX_ENTRIES)?;
        validation::validate_range("workload.entry_width", self.entry_width, 1, MAX_ENTRY_WIDTH)?;
        validation::validate_range("workload.fizzbuzz_limit", self.fizzbuzz_limit, 0, 10_000_000)?;
        Ok(())
    }
}

/// Rejects empty or whitespace-only entries of a measurement command.
pub fn validate_measure_command(command: &[String]) -> Result<()> {
    for part in command {
        validation::validate_non_empty_string("runtime.measure_command", part)?;
    }
    Ok(())
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.workload_params().validate()?;
        self.workload_kind()?;
        self.language()?;

        for (field, value) in [
            ("runtime.workspace", self.workspace()),
            ("runtime.bin_dir", self.bin_dir()),
            ("runtime.out_dir", self.out_dir()),
        ] {
            if let Some(path) = value {
                validation::validate_path(field, path)?;
            }
        }

        if let Some(command) = self.measure_command() {
            validate_measure_command(command)?;
        }

        Ok(())
    }
}
