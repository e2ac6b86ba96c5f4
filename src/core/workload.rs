use crate::domain::model::{DataEntry, MemoryReport, WorkloadKind, WorkloadParams, WorkloadReport};
use crate::domain::ports::Workload;
use crate::utils::error::{PetriError, Result};

/// Longest Fibonacci sequence whose last term still fits in a `u64`.
pub const MAX_FIBONACCI_TERMS: usize = 94;

/// Builds the Fibonacci sequence by iterative summation until it holds `n`
/// terms. The seed `[0, 1]` is always present, so `n < 2` still yields two terms.
pub fn fibonacci(n: usize) -> Result<Vec<u64>> {
    let mut sequence: Vec<u64> = Vec::with_capacity(n.max(2));
    sequence.extend([0, 1]);

    while sequence.len() < n {
        let len = sequence.len();
        let next = sequence[len - 1]
            .checked_add(sequence[len - 2])
            .ok_or_else(|| PetriError::WorkloadError {
                message: format!(
                    "Fibonacci term {} overflows u64 (at most {} terms are supported)",
                    len, MAX_FIBONACCI_TERMS
                ),
            })?;
        sequence.push(next);
    }

    Ok(sequence)
}

/// Sieve of Eratosthenes. Returns every prime in `[2, limit]` in ascending order.
pub fn prime_sieve(limit: usize) -> Result<Vec<usize>> {
    let cells = limit.checked_add(1).ok_or_else(|| PetriError::WorkloadError {
        message: format!("Prime limit {} is too large for a sieve", limit),
    })?;
    let mut sieve: Vec<bool> = reserve(cells, "prime sieve")?;
    sieve.resize(cells, true);
    sieve[0] = false;
    if limit > 0 {
        sieve[1] = false;
    }

    let mut i = 2;
    while i <= limit / i {
        if sieve[i] {
            // smaller multiples were already cleared by smaller primes
            let mut j = i * i;
            while j <= limit {
                sieve[j] = false;
                j += i;
            }
        }
        i += 1;
    }

    Ok(sieve
        .into_iter()
        .enumerate()
        .filter_map(|(n, is_prime)| is_prime.then_some(n))
        .collect())
}

/// Allocates the filler records, the Fibonacci sequence and the primes, and
/// reports their sizes. The collections stay alive until the report is built
/// so the allocations show up in the process footprint.
pub fn memory_allocator(params: &WorkloadParams) -> Result<MemoryReport> {
    let mut data = reserve(params.entries, "data entries")?;
    for i in 0..params.entries {
        data.push(filler_entry(i, params.entry_width)?);
    }
    tracing::debug!("Allocated {} data entries", data.len());

    let fib = fibonacci(params.fibonacci_terms)?;
    let primes = prime_sieve(params.prime_limit)?;
    tracing::debug!(
        "Computed {} fibonacci terms and {} primes",
        fib.len(),
        primes.len()
    );

    let fibonacci_last = fib.last().copied().unwrap_or_default();

    Ok(MemoryReport {
        entries: data.len(),
        fibonacci_terms: params.fibonacci_terms,
        fibonacci_len: fib.len(),
        fibonacci_last,
        prime_limit: params.prime_limit,
        primes_found: primes.len(),
        largest_prime: primes.last().copied(),
        total_operations: data.len() + fib.len() + primes.len(),
    })
}

fn filler_entry(id: usize, width: usize) -> Result<DataEntry> {
    let mut data = reserve(width, "entry data")?;
    data.extend(0..width);
    Ok(DataEntry::new(id, data))
}

/// Empty vector with room for `capacity` items, or a workload error when the
/// allocation cannot be made.
fn reserve<T>(capacity: usize, what: &str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(capacity)
        .map_err(|e| PetriError::WorkloadError {
            message: format!("Cannot allocate {} items for {}: {}", capacity, what, e),
        })?;
    Ok(items)
}

/// The PetriBench memory benchmark.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkload {
    params: WorkloadParams,
}

impl MemoryWorkload {
    pub fn new(params: WorkloadParams) -> Self {
        Self { params }
    }
}

impl Workload for MemoryWorkload {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Memory
    }

    fn run(&self) -> Result<WorkloadReport> {
        memory_allocator(&self.params).map(WorkloadReport::Memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prime(n: usize) -> bool {
        n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn test_fibonacci_recurrence() {
        let fib = fibonacci(50).unwrap();
        assert_eq!(fib.len(), 50);
        assert_eq!(&fib[..8], &[0, 1, 1, 2, 3, 5, 8, 13]);
        for i in 2..fib.len() {
            assert_eq!(fib[i], fib[i - 1] + fib[i - 2]);
        }
        assert!(fib.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*fib.last().unwrap(), 7_778_742_049);
    }

    #[test]
    fn test_fibonacci_short_requests_keep_seed() {
        assert_eq!(fibonacci(0).unwrap(), vec![0, 1]);
        assert_eq!(fibonacci(1).unwrap(), vec![0, 1]);
        assert_eq!(fibonacci(2).unwrap(), vec![0, 1]);
        assert_eq!(fibonacci(3).unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn test_fibonacci_u64_boundary() {
        let fib = fibonacci(MAX_FIBONACCI_TERMS).unwrap();
        assert_eq!(*fib.last().unwrap(), 12_200_160_415_121_876_738);
        assert!(matches!(
            fibonacci(MAX_FIBONACCI_TERMS + 1),
            Err(PetriError::WorkloadError { .. })
        ));
    }

    #[test]
    fn test_prime_sieve_matches_trial_division() {
        let primes = prime_sieve(1000).unwrap();
        let expected: Vec<usize> = (0..=1000).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, expected);
        assert_eq!(primes.len(), 168);
        assert_eq!(primes.last(), Some(&997));
    }

    #[test]
    fn test_prime_sieve_small_limits() {
        assert!(prime_sieve(0).unwrap().is_empty());
        assert!(prime_sieve(1).unwrap().is_empty());
        assert_eq!(prime_sieve(2).unwrap(), vec![2]);
        assert_eq!(prime_sieve(10).unwrap(), vec![2, 3, 5, 7]);
        assert_eq!(prime_sieve(49).unwrap(), prime_sieve(50).unwrap());
    }

    #[test]
    fn test_prime_sieve_unrepresentable_limit() {
        assert!(matches!(
            prime_sieve(usize::MAX),
            Err(PetriError::WorkloadError { .. })
        ));
        assert!(matches!(
            prime_sieve(usize::MAX - 1),
            Err(PetriError::WorkloadError { .. })
        ));
    }

    #[test]
    fn test_memory_allocator_total() {
        let report = memory_allocator(&WorkloadParams::default()).unwrap();
        assert_eq!(report.entries, 1000);
        assert_eq!(report.fibonacci_len, 50);
        assert_eq!(report.primes_found, 168);
        assert_eq!(report.largest_prime, Some(997));
        assert_eq!(report.total_operations, 1218);
        assert_eq!(
            report.total_operations,
            report.entries + report.fibonacci_len + report.primes_found
        );
    }

    #[test]
    fn test_memory_allocator_custom_sizes() {
        let params = WorkloadParams {
            fibonacci_terms: 10,
            prime_limit: 30,
            entries: 5,
            entry_width: 3,
            ..WorkloadParams::default()
        };
        let report = memory_allocator(&params).unwrap();
        assert_eq!(report.fibonacci_last, 34);
        assert_eq!(report.primes_found, 10);
        assert_eq!(report.largest_prime, Some(29));
        assert_eq!(report.total_operations, 5 + 10 + 10);
    }

    #[test]
    fn test_memory_allocator_oversized_requests_fail_cleanly() {
        let params = WorkloadParams {
            entries: usize::MAX,
            ..WorkloadParams::default()
        };
        assert!(matches!(
            memory_allocator(&params),
            Err(PetriError::WorkloadError { .. })
        ));

        let params = WorkloadParams {
            entries: 1,
            entry_width: usize::MAX,
            ..WorkloadParams::default()
        };
        assert!(matches!(
            memory_allocator(&params),
            Err(PetriError::WorkloadError { .. })
        ));
    }

    #[test]
    fn test_report_rendering() {
        let report = memory_allocator(&WorkloadParams::default()).unwrap();
        assert_eq!(
            report.render_lines(),
            vec![
                "Generated 1000 data entries",
                "Fibonacci(50): 50 numbers, last value: 7778742049",
                "Primes up to 1000: 168 found",
                "Largest prime: 997",
            ]
        );
    }

    #[test]
    fn test_workload_trait() {
        let workload = MemoryWorkload::default();
        assert_eq!(workload.kind(), WorkloadKind::Memory);
        assert!(matches!(workload.run().unwrap(), WorkloadReport::Memory(_)));
    }
}
