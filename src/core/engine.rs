use crate::domain::model::{RunSummary, WorkloadReport};
use crate::domain::ports::Workload;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;
use std::io::Write;
use std::time::Instant;

pub const BANNER: &str = "PetriBench Memory Benchmark";
pub const SEPARATOR: &str = "------------------------------";

pub struct BenchEngine<W: Workload> {
    workload: W,
    monitor: SystemMonitor,
}

impl<W: Workload> BenchEngine<W> {
    pub fn new(workload: W) -> Self {
        Self::new_with_monitoring(workload, false)
    }

    pub fn new_with_monitoring(workload: W, monitor_enabled: bool) -> Self {
        Self {
            workload,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs the workload and prints its report to stdout.
    pub fn run(&self) -> Result<RunSummary> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_writer(&mut out)
    }

    pub fn run_with_writer<O: Write>(&self, out: &mut O) -> Result<RunSummary> {
        let kind = self.workload.kind();
        tracing::debug!("Starting {} workload", kind);
        self.monitor.log_stats("Before workload");

        let started_at = Utc::now();
        let start = Instant::now();

        let report = self.workload.run()?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        self.monitor.log_stats("After workload");

        match &report {
            WorkloadReport::Memory(memory) => {
                writeln!(out, "{}", BANNER)?;
                writeln!(out, "{}", SEPARATOR)?;
                for line in memory.render_lines() {
                    writeln!(out, "{}", line)?;
                }
                writeln!(out, "Total operations: {}", memory.total_operations)?;
                writeln!(out, "Benchmark completed successfully")?;
            }
            WorkloadReport::FizzBuzz(fizzbuzz) => {
                for line in &fizzbuzz.lines {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        out.flush()?;

        self.monitor.log_final_stats();
        tracing::debug!("{} workload finished in {}ms", kind, elapsed_ms);

        Ok(RunSummary {
            workload: kind,
            started_at,
            elapsed_ms,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fizzbuzz::FizzBuzzWorkload;
    use crate::core::workload::MemoryWorkload;
    use crate::domain::model::{WorkloadKind, WorkloadParams};
    use crate::utils::error::PetriError;

    struct FailingWorkload;

    impl Workload for FailingWorkload {
        fn kind(&self) -> WorkloadKind {
            WorkloadKind::Memory
        }

        fn run(&self) -> Result<WorkloadReport> {
            Err(PetriError::WorkloadError {
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn test_memory_run_output() {
        let engine = BenchEngine::new(MemoryWorkload::default());
        let mut out = Vec::new();
        let summary = engine.run_with_writer(&mut out).unwrap();

        let expected = "\
PetriBench Memory Benchmark
------------------------------
Generated 1000 data entries
Fibonacci(50): 50 numbers, last value: 7778742049
Primes up to 1000: 168 found
Largest prime: 997
Total operations: 1218
Benchmark completed successfully
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(summary.workload, WorkloadKind::Memory);
    }

    #[test]
    fn test_fizzbuzz_run_output() {
        let engine = BenchEngine::new(FizzBuzzWorkload::new(5));
        let mut out = Vec::new();
        engine.run_with_writer(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n2\nFizz\n4\nBuzz\n");
    }

    #[test]
    fn test_summary_serializes() {
        let params = WorkloadParams {
            entries: 3,
            ..WorkloadParams::default()
        };
        let engine = BenchEngine::new_with_monitoring(MemoryWorkload::new(params), true);
        let summary = engine.run_with_writer(&mut std::io::sink()).unwrap();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["workload"], "memory");
        assert_eq!(json["report"]["kind"], "memory");
        assert_eq!(json["report"]["total_operations"], 3 + 50 + 168);
    }

    #[test]
    fn test_workload_failure_writes_nothing() {
        let engine = BenchEngine::new(FailingWorkload);
        let mut out = Vec::new();
        assert!(engine.run_with_writer(&mut out).is_err());
        assert!(out.is_empty());
    }
}
