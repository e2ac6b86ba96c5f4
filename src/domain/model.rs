use crate::utils::error::PetriError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_FIBONACCI_TERMS: usize = 50;
pub const DEFAULT_PRIME_LIMIT: usize = 1000;
pub const DEFAULT_ENTRIES: usize = 1000;
pub const DEFAULT_ENTRY_WIDTH: usize = 10;
pub const DEFAULT_FIZZBUZZ_LIMIT: usize = 100;

/// Filler record allocated by the memory workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEntry {
    pub id: usize,
    pub value: String,
    pub data: Vec<usize>,
}

impl DataEntry {
    pub fn new(id: usize, data: Vec<usize>) -> Self {
        Self {
            id,
            value: (id * 42).to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadParams {
    pub fibonacci_terms: usize,
    pub prime_limit: usize,
    pub entries: usize,
    pub entry_width: usize,
    pub fizzbuzz_limit: usize,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            fibonacci_terms: DEFAULT_FIBONACCI_TERMS,
            prime_limit: DEFAULT_PRIME_LIMIT,
            entries: DEFAULT_ENTRIES,
            entry_width: DEFAULT_ENTRY_WIDTH,
            fizzbuzz_limit: DEFAULT_FIZZBUZZ_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub entries: usize,
    pub fibonacci_terms: usize,
    pub fibonacci_len: usize,
    pub fibonacci_last: u64,
    pub prime_limit: usize,
    pub primes_found: usize,
    pub largest_prime: Option<usize>,
    pub total_operations: usize,
}

impl MemoryReport {
    pub fn render_lines(&self) -> Vec<String> {
        let largest = self
            .largest_prime
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());

        vec![
            format!("Generated {} data entries", self.entries),
            format!(
                "Fibonacci({}): {} numbers, last value: {}",
                self.fibonacci_terms, self.fibonacci_len, self.fibonacci_last
            ),
            format!(
                "Primes up to {}: {} found",
                self.prime_limit, self.primes_found
            ),
            format!("Largest prime: {}", largest),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FizzBuzzReport {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkloadReport {
    Memory(MemoryReport),
    FizzBuzz(FizzBuzzReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub workload: WorkloadKind,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub report: WorkloadReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    #[default]
    Memory,
    FizzBuzz,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadKind::Memory => write!(f, "memory"),
            WorkloadKind::FizzBuzz => write!(f, "fizzbuzz"),
        }
    }
}

impl FromStr for WorkloadKind {
    type Err = PetriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "benchmark" => Ok(WorkloadKind::Memory),
            "fizzbuzz" => Ok(WorkloadKind::FizzBuzz),
            other => Err(PetriError::InvalidConfigValueError {
                field: "workload.kind".to_string(),
                value: other.to_string(),
                reason: "Valid workloads: memory, fizzbuzz".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    C,
    Cpp,
    Rust,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::Go, Language::C, Language::Cpp, Language::Rust];

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Go => "Go",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Rust => "Rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Language::Go => "go",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for Language {
    type Err = PetriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Language::Go),
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(PetriError::UnsupportedLanguageError {
                value: s.to_string(),
            }),
        }
    }
}

/// A command to spawn: program, arguments, working directory, extra environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Shell-like rendering for logs and dry runs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            signal: None,
        }
    }

    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            signal: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
