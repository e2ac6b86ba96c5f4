//! C++ image profile

use super::{measurement_tools, BuildRule, LanguageProfile, Placeholder, RuleOutput, RuntimeRule};
use crate::domain::model::Language;
use std::collections::BTreeMap;

const PLACEHOLDER: &str = "#include <iostream>\nint main() { std::cout << \"No C++ program found\" << std::endl; return 0; }\n";

fn gxx(out: &'static str, source: &'static str) -> Vec<&'static str> {
    vec!["g++", "-O3", "-static", "-std=c++17", "-o", out, source]
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        language: Language::Cpp,
        build_rules: vec![
            BuildRule {
                marker: "benchmark.cpp",
                commands: vec![gxx("{out}/benchmark", "benchmark.cpp")],
                output: RuleOutput::Artifact("benchmark"),
            },
            BuildRule {
                marker: "program.cpp",
                commands: vec![gxx("{out}/program", "program.cpp")],
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
                marker: "placeholder.cpp",
                commands: vec![gxx("{out}/program", "placeholder.cpp")],
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
        "PetriBench C++ Runtime (Multi-stage Optimized)".to_string(),
        "Available tools:".to_string(),
        "  - Pre-compiled C++ binary (static)".to_string(),
    ];
    lines.extend(measurement_tools());
    lines.extend(
        [
            "",
            "Size: ~110MB (vs ~390MB single-stage, 72% reduction)",
            "Runtime: Pre-compiled static binary, no G++ toolchain",
            "Debian: Full environment preserved for apt-get extensions",
            "Binary: Optimized with -O3 static linking, C++17 standard",
            "",
            "Usage examples:",
            "  # Run pre-compiled binary:",
            "  docker run petribench-cpp",
            "  docker run petribench-cpp /usr/bin/time -v /usr/local/bin/benchmark",
            "  # Memory measurement:",
            "  docker run petribench-cpp sh -c \"/usr/local/bin/benchmark & measure_memory -P \\$!\"",
            "  # Build custom binary:",
            "  docker build -f Dockerfile.cpp -t petribench-cpp .",
        ]
        .map(String::from),
    );
    lines
}
