//! Run coordinator
//!
//! Spawns one worker thread per identity, enforces the run deadline, raises
//! the shutdown signal, and joins every worker before reporting the overall
//! outcome. The coordinator observes only the shared signal and thread
//! completion, never individual worker state; repeated worker-level failures
//! do not fail the run.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::signals::ShutdownSignal;
use super::worker::Worker;
use crate::client::TagClient;
use crate::config::RunConfig;
use crate::metrics::{RunSummary, WorkerLog, WorkerSummary};
use crate::utils::{HarnessError, Result};

/// Poll interval for the run deadline.
const DEADLINE_POLL: Duration = Duration::from_millis(100);

/// Overall run outcome. Reported on the console only; the process exit code
/// stays 0 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The run ended by deadline expiry
    Success,
    /// The shutdown signal was raised before the deadline
    Failure,
}

/// Run the whole stress test: spawn, wait out the deadline, signal shutdown,
/// join, and report.
pub fn run<C: TagClient>(config: &RunConfig, client: Arc<C>) -> Result<ExitStatus> {
    let shutdown = Arc::new(ShutdownSignal::new());
    let identities = config.identities();

    info!(
        "starting run with {} workers each handling {} elements for {}s",
        identities.len(),
        config.elements_per_worker,
        config.duration_secs
    );

    let mut handles: Vec<thread::JoinHandle<WorkerSummary>> =
        Vec::with_capacity(identities.len());

    let start = Instant::now();

    for identity in identities {
        let log = WorkerLog::create(&config.log_dir, &identity).map_err(HarnessError::Io)?;
        let worker = Worker::new(
            identity,
            Arc::clone(&client),
            Arc::clone(&shutdown),
            config.timeouts,
            log,
        );

        info!(
            "creating worker {} with {} elements",
            identity.id, identity.elements
        );

        let handle = thread::Builder::new()
            .name(format!("worker-{}", identity.id))
            .spawn(move || worker.run())
            .map_err(HarnessError::Io)?;
        handles.push(handle);
    }

    wait_for_deadline(&shutdown, start + config.duration(), config);

    // Success is decided from the signal state observed when the wait ends,
    // before the coordinator's own set.
    let status = if shutdown.is_set() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    };
    shutdown.set();

    let summaries: Vec<WorkerSummary> = handles
        .into_iter()
        .map(|h| h.join().expect("Worker thread panicked"))
        .collect();

    let elapsed = start.elapsed();
    info!("all workers terminated");

    let summary = RunSummary::merge(elapsed, &summaries);
    if !config.quiet {
        summary.print();
    }

    match status {
        ExitStatus::Success => info!("test SUCCEEDED"),
        ExitStatus::Failure => warn!("test FAILED"),
    }

    Ok(status)
}

/// Poll until the deadline passes or the signal is raised, driving a
/// progress bar over elapsed seconds.
fn wait_for_deadline(shutdown: &ShutdownSignal, deadline: Instant, config: &RunConfig) {
    let pb = if config.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(config.duration_secs);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}s/{len}s")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    };

    let start = Instant::now();
    while !shutdown.is_set() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        pb.set_position(start.elapsed().as_secs());
        thread::sleep(DEADLINE_POLL.min(remaining));
    }
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SimClient;
    use crate::config::Timeouts;

    fn test_config(workers: u32, elements: u32, duration_secs: u64, dir: &std::path::Path) -> RunConfig {
        RunConfig::new(workers, elements, duration_secs)
            .log_dir(dir)
            .quiet(true)
            .timeouts(Timeouts {
                data_timeout: Duration::from_millis(100),
                create_timeout: Duration::from_millis(30),
                pending_poll: Duration::from_millis(1),
                backoff_poll: Duration::from_millis(1),
            })
    }

    #[test]
    fn test_zero_duration_terminates_promptly() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(2, 2, 0, dir.path());
        let client = Arc::new(SimClient::healthy(config.total_elements()));

        let start = Instant::now();
        let status = run(&config, client).unwrap();
        assert_eq!(status, ExitStatus::Success);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_healthy_run_reports_success_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(3, 2, 1, dir.path());
        let client = Arc::new(SimClient::healthy(config.total_elements()));

        let status = run(&config, client).unwrap();
        assert_eq!(status, ExitStatus::Success);

        for id in 1..=3 {
            let path = dir.path().join(format!("test-{}.log", id));
            let content = std::fs::read_to_string(&path).unwrap();
            assert!(content.contains("terminating"), "worker {} log incomplete", id);
            assert!(content.contains("updated 2 elements"), "worker {} made no cycles", id);
        }
    }

    #[test]
    fn test_run_with_failing_client_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(2, 2, 0, dir.path());
        let client = Arc::new(SimClient::failing_create());

        // worker-level failures never fail the run
        let status = run(&config, client).unwrap();
        assert_eq!(status, ExitStatus::Success);
    }

    #[test]
    fn test_spawns_one_log_per_worker() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(5, 1, 0, dir.path());
        let client = Arc::new(SimClient::healthy(config.total_elements()));

        run(&config, client).unwrap();

        let logs = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(logs, 5);
    }
}
