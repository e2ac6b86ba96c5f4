//! Per-language image profiles: how the build stage compiles a workspace and
//! how the runtime stage decides what to run.

pub mod c;
pub mod cpp;
pub mod go;
pub mod rust;

use crate::domain::model::Language;
use std::collections::BTreeMap;

/// Substituted with the artifact output directory in command templates.
pub const OUT_DIR_TOKEN: &str = "{out}";

/// Where a rule leaves its compiled binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutput {
    /// The commands write this file into the output directory.
    Artifact(&'static str),
    /// Whatever the build left in this directory, relative to the workspace.
    /// Resolved by `builder::find_build_output`.
    NewestExecutable(&'static str),
}

/// Compile recipe selected when `marker` exists in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRule {
    pub marker: &'static str,
    pub commands: Vec<Vec<&'static str>>,
    pub output: RuleOutput,
}

/// Source written and compiled when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub contents: &'static str,
    pub rule: BuildRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeRule {
    /// Run `program` when any marker is present in the workspace, else show usage.
    SourceMarkers {
        markers: Vec<&'static str>,
        program: &'static str,
    },
    /// Run the first candidate that exists in the binary directory, else show usage.
    BinaryCandidates(Vec<&'static str>),
}

#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language: Language,
    pub build_rules: Vec<BuildRule>,
    pub placeholder: Placeholder,
    pub build_env: BTreeMap<String, String>,
    /// Every name the build leaves in the output directory; the primary
    /// artifact is copied to the others.
    pub artifacts: Vec<&'static str>,
    pub runtime: RuntimeRule,
    pub banner: Vec<String>,
}

impl LanguageProfile {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Go => go::profile(),
            Language::C => c::profile(),
            Language::Cpp => cpp::profile(),
            Language::Rust => rust::profile(),
        }
    }

    /// Image tag used in the usage examples.
    pub fn image_name(&self) -> String {
        format!("petribench-{}", self.language)
    }
}

/// Shared tail of every usage banner: the measurement tools available in the base image.
pub(crate) fn measurement_tools() -> Vec<String> {
    vec![
        "  - /usr/bin/time (GNU time for RSS measurement)".to_string(),
        "  - measure_memory (PSS/USS measurement)".to_string(),
        "  - /proc/self/smaps_rollup (direct proc parsing)".to_string(),
        "  - measure_memory --help (smem2 replacement)".to_string(),
    ]
}

pub(crate) fn env_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
