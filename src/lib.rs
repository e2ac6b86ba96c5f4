pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::process::SystemRunner;
pub use config::toml_config::TomlConfig;
pub use core::{
    builder::Builder, engine::BenchEngine, entrypoint::Entrypoint, fizzbuzz::FizzBuzzWorkload,
    profile::LanguageProfile, workload::MemoryWorkload,
};
pub use domain::model::{Language, WorkloadKind, WorkloadParams};
pub use utils::error::{PetriError, Result};
