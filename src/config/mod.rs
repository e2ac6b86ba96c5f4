#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "petribench")]
#[command(about = "Build, run and measure PetriBench memory benchmarks", version)]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to ./petribench.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a benchmark workload in this process
    Run(RunArgs),
    /// Show what the build stage would compile, without running anything
    Plan(BuildArgs),
    /// Compile the workspace the way the image build stage does
    Build(BuildArgs),
    /// Run the compiled program under the measurement tool, or print usage
    Entrypoint(EntrypointArgs),
    /// Print the usage banner of a runtime image
    Usage(UsageArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// memory (default) or fizzbuzz
    #[arg(long)]
    pub workload: Option<String>,

    #[arg(long)]
    pub fibonacci_terms: Option<usize>,

    #[arg(long)]
    pub prime_limit: Option<usize>,

    #[arg(long)]
    pub entries: Option<usize>,

    #[arg(long)]
    pub entry_width: Option<usize>,

    #[arg(long)]
    pub fizzbuzz_limit: Option<usize>,

    #[arg(long, help = "Log process CPU and memory around the workload")]
    pub monitor: bool,

    #[arg(long, help = "Print a JSON run summary after the report")]
    pub json: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    #[arg(short, long)]
    pub language: Option<String>,

    /// Directory holding the sources (default: current directory)
    #[arg(long)]
    pub workspace: Option<String>,

    /// Where artifacts are written (default: the workspace)
    #[arg(long)]
    pub out_dir: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct EntrypointArgs {
    #[arg(short, long)]
    pub language: Option<String>,

    /// Directory checked for mounted sources (default: /workspace)
    #[arg(long)]
    pub workspace: Option<String>,

    /// Directory holding the compiled binaries (default: /usr/local/bin)
    #[arg(long)]
    pub bin_dir: Option<String>,

    #[arg(long, help = "Run the program without the measurement wrapper")]
    pub no_measure: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Args)]
pub struct UsageArgs {
    #[arg(short, long)]
    pub language: Option<String>,
}
