use anyhow::Context;
use clap::Parser;
use petribench::domain::model::{
    DEFAULT_ENTRIES, DEFAULT_ENTRY_WIDTH, DEFAULT_FIBONACCI_TERMS, DEFAULT_FIZZBUZZ_LIMIT,
    DEFAULT_PRIME_LIMIT,
};
use petribench::utils::{logger, validation::Validate};
use petribench::{BenchEngine, MemoryWorkload, WorkloadParams};

/// The PetriBench memory benchmark as a standalone program. This is the binary
/// the runtime images execute under the measurement tool.
#[derive(Parser)]
#[command(name = "benchmark")]
#[command(about = "PetriBench memory benchmark: fibonacci, prime sieve and filler allocations")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_FIBONACCI_TERMS)]
    fibonacci_terms: usize,

    #[arg(long, default_value_t = DEFAULT_PRIME_LIMIT)]
    prime_limit: usize,

    #[arg(long, default_value_t = DEFAULT_ENTRIES)]
    entries: usize,

    #[arg(long, default_value_t = DEFAULT_ENTRY_WIDTH)]
    entry_width: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let params = WorkloadParams {
        fibonacci_terms: args.fibonacci_terms,
        prime_limit: args.prime_limit,
        entries: args.entries,
        entry_width: args.entry_width,
        fizzbuzz_limit: DEFAULT_FIZZBUZZ_LIMIT,
    };
    params.validate().context("invalid benchmark parameters")?;

    BenchEngine::new(MemoryWorkload::new(params))
        .run()
        .context("benchmark failed")?;

    Ok(())
}
