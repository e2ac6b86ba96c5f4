//! C image profile

use super::{measurement_tools, BuildRule, LanguageProfile, Placeholder, RuleOutput, RuntimeRule};
use crate::domain::model::Language;
use std::collections::BTreeMap;

const PLACEHOLDER: &str = "#include <stdio.h>\nint main() { printf(\"No C program found\\n\"); return 0; }\n";

fn gcc(out: &'static str, source: &'static str) -> Vec<&'static str> {
    vec!["gcc", "-O3", "-static", "-o", out, source]
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        language: Language::C,
        build_rules: vec![
            BuildRule {
                marker: "benchmark.c",
                commands: vec![gcc("{out}/benchmark", "benchmark.c")],
                output: RuleOutput::Artifact("benchmark"),
            },
            BuildRule {
                marker: "program.c",
                commands: vec![gcc("{out}/program", "program.c")],
                output: RuleOutput::Artifact("program"),
            },
            BuildRule {
                marker: "Makefile",
                commands: vec![vec!["make"]],
                output: RuleOutput::NewestExecutable("."),
            },
        ],
        placeholder: Placeholder {
            contents: PLACEHOLDER,
            rule: BuildRule {
                marker: "placeholder.c",
                commands: vec![gcc("{out}/program", "placeholder.c")],
                output: RuleOutput::Artifact("program"),
            },
        },
        build_env: BTreeMap::new(),
        artifacts: vec!["benchmark", "program"],
        runtime: RuntimeRule::BinaryCandidates(vec!["benchmark", "program"]),
        banner: banner(),
    }
}

fn banner() -> Vec<String> {
    let mut lines = vec![
        "PetriBench C Runtime (Multi-stage Optimized)".to_string(),
        "Available tools:".to_string(),
        "  - Pre-compiled C binary (static)".to_string(),
    ];
    lines.extend(measurement_tools());
    lines.extend(
        [
            "",
            "Size: ~110MB (vs ~340MB single-stage, 70% reduction)",
            "Runtime: Pre-compiled static binary, no GCC toolchain",
            "Debian: Full environment preserved for apt-get extensions",
            "Binary: Optimized with -O3 static linking",
            "",
            "Usage examples:",
            "  # Run pre-compiled binary:",
            "  docker run petribench-c",
            "  docker run petribench-c /usr/bin/time -v /usr/local/bin/benchmark",
            "  # Memory measurement:",
            "  docker run petribench-c sh -c \"/usr/local/bin/benchmark & measure_memory -P \\$!\"",
            "  # Build custom binary:",
            "  docker build -f Dockerfile.c -t petribench-c .",
        ]
        .map(String::from),
    );
    lines
}
