//! Run configuration derived from CLI arguments

use std::path::PathBuf;
use std::time::Duration;

use super::cli::CliArgs;

/// Hard cap on concurrently running workers. Larger requests are clamped,
/// not rejected.
pub const MAX_WORKERS: u32 = 100;

/// Fixed operation timeouts and poll intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Bound on each whole-buffer read or write call
    pub data_timeout: Duration,
    /// Bound on asynchronous tag creation; doubles as the retry backoff window
    pub create_timeout: Duration,
    /// Poll interval while tag creation is pending
    pub pending_poll: Duration,
    /// Poll interval for the shutdown signal during a backoff wait
    pub backoff_poll: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            data_timeout: Duration::from_millis(1500),
            create_timeout: Duration::from_millis(5000),
            pending_poll: Duration::from_millis(1),
            backoff_poll: Duration::from_millis(5),
        }
    }
}

/// Complete run configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Worker count after clamping to [`MAX_WORKERS`]
    pub workers: u32,
    pub elements_per_worker: u32,
    pub duration_secs: u64,
    /// Directory receiving the per-worker log files
    pub log_dir: PathBuf,
    pub timeouts: Timeouts,
    /// Suppress the console progress bar and merged summary
    pub quiet: bool,
}

impl RunConfig {
    pub fn new(workers: u32, elements_per_worker: u32, duration_secs: u64) -> Self {
        Self {
            workers: workers.min(MAX_WORKERS),
            elements_per_worker,
            duration_secs,
            log_dir: PathBuf::from("."),
            timeouts: Timeouts::default(),
            quiet: false,
        }
    }

    /// Build and validate configuration from CLI arguments.
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        if args.workers == 0 {
            return Err("worker count must be positive".to_string());
        }
        if args.elements_per_worker == 0 {
            return Err("elements per worker must be positive".to_string());
        }
        Ok(Self::new(args.workers, args.elements_per_worker, args.duration_secs))
    }

    /// Set the directory for per-worker log files.
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Override the fixed timeouts (tests shorten the backoff window).
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// One identity per worker, ids assigned descending: the first spawned
    /// thread gets the highest id.
    pub fn identities(&self) -> Vec<WorkerIdentity> {
        (0..self.workers)
            .map(|index| WorkerIdentity {
                id: self.workers - index,
                elements: self.elements_per_worker,
            })
            .collect()
    }

    /// Remote elements needed to back every worker's range.
    ///
    /// Ids run `1..=workers`, so the highest range ends at
    /// `(workers + 1) * elements_per_worker`.
    pub fn total_elements(&self) -> usize {
        (self.workers as usize + 1) * self.elements_per_worker as usize
    }
}

/// Identity of one worker thread. Immutable after creation; owned exclusively
/// by its worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerIdentity {
    /// Worker id, assigned descending from the worker count
    pub id: u32,
    /// Elements in this worker's range
    pub elements: u32,
}

impl WorkerIdentity {
    /// First element index of this worker's disjoint range.
    pub fn start_index(&self) -> u32 {
        self.id * self.elements
    }

    /// Log file name derived from the identity.
    pub fn log_name(&self) -> String {
        format!("test-{}.log", self.id)
    }
}
