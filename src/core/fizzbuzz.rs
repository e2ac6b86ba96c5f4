use crate::domain::model::{FizzBuzzReport, WorkloadKind, WorkloadReport};
use crate::domain::ports::Workload;
use crate::utils::error::Result;

pub fn fizzbuzz_line(n: usize) -> String {
    match (n % 3, n % 5) {
        (0, 0) => "FizzBuzz".to_string(),
        (0, _) => "Fizz".to_string(),
        (_, 0) => "Buzz".to_string(),
        _ => n.to_string(),
    }
}

/// FizzBuzz over `1..=limit`, the smallest sample program shipped with the images.
#[derive(Debug, Clone)]
pub struct FizzBuzzWorkload {
    limit: usize,
}

impl FizzBuzzWorkload {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Workload for FizzBuzzWorkload {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::FizzBuzz
    }

    fn run(&self) -> Result<WorkloadReport> {
        let lines = (1..=self.limit).map(fizzbuzz_line).collect();
        Ok(WorkloadReport::FizzBuzz(FizzBuzzReport { lines }))
    }
}
