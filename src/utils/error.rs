use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetriError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported language: {value}")]
    UnsupportedLanguageError { value: String },

    #[error("Workload error: {message}")]
    WorkloadError { message: String },

    #[error("Failed to spawn '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Build command '{command}' failed with exit code {}", describe_exit(.exit_code))]
    BuildFailedError {
        command: String,
        exit_code: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Workload,
    Process,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PetriError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PetriError::TomlParseError(_)
            | PetriError::ConfigError { .. }
            | PetriError::InvalidConfigValueError { .. }
            | PetriError::MissingConfigError { .. }
            | PetriError::UnsupportedLanguageError { .. } => ErrorCategory::Configuration,
            PetriError::WorkloadError { .. } => ErrorCategory::Workload,
            PetriError::SpawnError { .. } | PetriError::BuildFailedError { .. } => {
                ErrorCategory::Process
            }
            PetriError::IoError(_) | PetriError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Workload => ErrorSeverity::High,
            ErrorCategory::Process => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PetriError::TomlParseError(_) => {
                "Check the configuration file for TOML syntax errors".to_string()
            }
            PetriError::ConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            PetriError::InvalidConfigValueError { field, .. } => {
                format!("Adjust the value of '{}' and try again", field)
            }
            PetriError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            PetriError::UnsupportedLanguageError { .. } => {
                "Use one of: go, c, cpp, rust".to_string()
            }
            PetriError::WorkloadError { .. } => {
                "Reduce the workload sizes (fibonacci terms must stay within u64)".to_string()
            }
            PetriError::SpawnError { program, .. } => {
                format!("Make sure '{}' is installed and on PATH", program)
            }
            PetriError::BuildFailedError { .. } => {
                "Inspect the compiler output above and fix the source".to_string()
            }
            PetriError::IoError(_) => "Check file permissions and available disk space".to_string(),
            PetriError::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PetriError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            PetriError::BuildFailedError { command, .. } => {
                format!("Compilation failed while running: {}", command)
            }
            PetriError::SpawnError { program, .. } => format!("Could not start '{}'", program),
            other => other.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // compiler failures surface with the tool's own exit code
            PetriError::BuildFailedError {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => match self.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, PetriError>;
