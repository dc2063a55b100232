//! Per-worker metrics and run-level aggregation

pub mod worker_log;

pub use worker_log::WorkerLog;

use std::time::Duration;

use hdrhistogram::Histogram;

/// Histogram bounds: 1us to 1 hour, 3 significant digits.
fn new_latency_histogram() -> Histogram<u64> {
    Histogram::new_with_bounds(1, 3_600_000_000, 3).expect("Failed to create histogram")
}

/// Metrics accumulated by one worker, mutated only by its owning thread and
/// read once at termination.
pub struct WorkerMetrics {
    /// Successful read-modify-write cycles
    pub iterations: u64,
    /// Wall time spent in I/O across all cycles, failed ones included
    pub cumulative_io: Duration,
    /// Latencies of successful cycles, in microseconds
    pub histogram: Histogram<u64>,
}

impl WorkerMetrics {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            cumulative_io: Duration::ZERO,
            histogram: new_latency_histogram(),
        }
    }

    /// Record the elapsed time of a cycle, successful or not.
    pub fn record_io(&mut self, elapsed: Duration) {
        self.cumulative_io += elapsed;
    }

    /// Record a fully successful cycle.
    pub fn record_success(&mut self, elapsed: Duration) {
        self.iterations += 1;
        self.histogram.record((elapsed.as_micros() as u64).max(1)).ok();
    }

    /// Average I/O time per successful cycle; zero when no cycle succeeded.
    pub fn average_io(&self) -> Duration {
        if self.iterations == 0 {
            Duration::ZERO
        } else {
            self.cumulative_io / u32::try_from(self.iterations).unwrap_or(u32::MAX)
        }
    }
}

impl Default for WorkerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result returned from a worker thread at join.
pub struct WorkerSummary {
    pub id: u32,
    pub metrics: WorkerMetrics,
}

/// Merged metrics for a whole run.
pub struct RunSummary {
    pub workers: u32,
    pub duration: Duration,
    pub iterations: u64,
    pub cumulative_io: Duration,
    pub histogram: Histogram<u64>,
}

impl RunSummary {
    /// Merge the per-worker summaries collected at join.
    pub fn merge(duration: Duration, summaries: &[WorkerSummary]) -> Self {
        let mut histogram = new_latency_histogram();
        let mut iterations = 0u64;
        let mut cumulative_io = Duration::ZERO;

        for summary in summaries {
            histogram.add(&summary.metrics.histogram).ok();
            iterations += summary.metrics.iterations;
            cumulative_io += summary.metrics.cumulative_io;
        }

        Self {
            workers: summaries.len() as u32,
            duration,
            iterations,
            cumulative_io,
            histogram,
        }
    }

    /// Print the merged summary (compact format).
    pub fn print(&self) {
        println!("\n=== run summary ===");
        println!(
            "Workers: {} | Successful cycles: {} | Duration: {:.2}s",
            self.workers,
            self.iterations,
            self.duration.as_secs_f64()
        );
        if self.iterations > 0 {
            println!(
                "Cycle latency (ms): p50={:.2} p99={:.2} max={:.2}",
                self.histogram.value_at_percentile(50.0) as f64 / 1000.0,
                self.histogram.value_at_percentile(99.0) as f64 / 1000.0,
                self.histogram.max() as f64 / 1000.0
            );
        }
    }
}
