//! Rust image profile. The bundled `benchmark` binary of this crate is what the
//! default Rust image runs.

use super::{env_of, measurement_tools, BuildRule, LanguageProfile, Placeholder, RuleOutput, RuntimeRule};
use crate::domain::model::Language;

const PLACEHOLDER: &str = r#"fn main() {
    println!("No Rust source provided. Mount benchmark.rs or a Cargo project to /workspace");
}
"#;

fn rustc(source: &'static str) -> Vec<&'static str> {
    vec!["rustc", "-C", "opt-level=3", "-o", "{out}/program", source]
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        language: Language::Rust,
        build_rules: vec![
            BuildRule {
                marker: "Cargo.toml",
                commands: vec![vec!["cargo", "build", "--release"]],
                output: RuleOutput::NewestExecutable("target/release"),
            },
            BuildRule {
                marker: "benchmark.rs",
                commands: vec![rustc("benchmark.rs")],
                output: RuleOutput::Artifact("program"),
            },
            BuildRule {
                marker: "main.rs",
                commands: vec![rustc("main.rs")],
                output: RuleOutput::Artifact("program"),
            },
        ],
        placeholder: Placeholder {
            contents: PLACEHOLDER,
            rule: BuildRule {
                marker: "placeholder.rs",
                commands: vec![rustc("placeholder.rs")],
                output: RuleOutput::Artifact("program"),
            },
        },
        build_env: env_of(&[("CARGO_TERM_COLOR", "never")]),
        artifacts: vec!["benchmark", "program"],
        runtime: RuntimeRule::BinaryCandidates(vec!["benchmark", "program"]),
        banner: banner(),
    }
}

fn banner() -> Vec<String> {
    let mut lines = vec![
        "PetriBench Rust Runtime (Multi-stage Optimized)".to_string(),
        "Available tools:".to_string(),
        "  - /usr/local/bin/benchmark (bundled memory benchmark)".to_string(),
        "  - petribench build / entrypoint (image helper)".to_string(),
    ];
    lines.extend(measurement_tools());
    lines.extend(
        [
            "",
            "Size: base image plus two static musl binaries",
            "Runtime: Statically linked binary, no cargo or rustc needed",
            "Debian: Full environment preserved for apt-get extensions",
            "",
            "Usage examples:",
            "  # Run the bundled benchmark:",
            "  docker run petribench-rust",
            "  docker run petribench-rust /usr/bin/time -v /usr/local/bin/benchmark",
            "  # Memory measurement:",
            "  docker run petribench-rust sh -c \"/usr/local/bin/benchmark & measure_memory -P \\$!\"",
            "  # Build custom binary:",
            "  docker build -f images/Dockerfile -t petribench-rust .",
        ]
        .map(String::from),
    );
    lines
}
