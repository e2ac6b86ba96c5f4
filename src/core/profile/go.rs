//! Go image profile

use super::{env_of, measurement_tools, BuildRule, LanguageProfile, Placeholder, RuleOutput, RuntimeRule};
use crate::domain::model::Language;

const PLACEHOLDER: &str = r#"package main

import "fmt"

func main() {
	fmt.Println("No Go source provided. Mount .go files or go.mod project to /workspace")
}
"#;

fn go_build(source: &'static str) -> Vec<&'static str> {
    vec!["go", "build", "-ldflags=-s -w", "-o", "{out}/program", source]
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        language: Language::Go,
        build_rules: vec![
            BuildRule {
                marker: "go.mod",
                commands: vec![vec!["go", "mod", "download"], go_build(".")],
                output: RuleOutput::Artifact("program"),
            },
            BuildRule {
                marker: "benchmark.go",
                commands: vec![go_build("benchmark.go")],
                output: RuleOutput::Artifact("program"),
            },
            BuildRule {
                marker: "script.go",
                commands: vec![go_build("script.go")],
                output: RuleOutput::Artifact("program"),
            },
        ],
        placeholder: Placeholder {
            contents: PLACEHOLDER,
            rule: BuildRule {
                marker: "main.go",
                commands: vec![go_build("main.go")],
                output: RuleOutput::Artifact("program"),
            },
        },
        // static binaries so the runtime image needs no Go toolchain
        build_env: env_of(&[("CGO_ENABLED", "0"), ("GOOS", "linux"), ("GOARCH", "amd64")]),
        artifacts: vec!["program"],
        runtime: RuntimeRule::SourceMarkers {
            markers: vec!["benchmark.go", "script.go", "go.mod"],
            program: "program",
        },
        banner: banner(),
    }
}

fn banner() -> Vec<String> {
    let mut lines = vec![
        "PetriBench Go Runtime (Multi-stage Optimized)".to_string(),
        "Available tools:".to_string(),
        "  - /usr/local/bin/program (compiled Go binary)".to_string(),
    ];
    lines.extend(measurement_tools());
    lines.extend(
        [
            "",
            "Size: ~110MB (vs ~150MB single-stage, 27% reduction)",
            "Runtime: Static binary, no Go toolchain needed",
            "Debian: Full environment preserved for apt-get extensions",
            "",
            "Usage examples:",
            "  # Mount source and rebuild:",
            "  docker build -f Dockerfile.go -t petribench-go .",
            "  docker run -v benchmark.go:/workspace/benchmark.go petribench-go",
            "  # Memory measurement:",
            "  docker run petribench-go sh -c \"/usr/local/bin/program & measure_memory -P \\$!\"",
        ]
        .map(String::from),
    );
    lines
}
