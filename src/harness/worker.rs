//! Per-thread worker state machine
//!
//! Each worker owns its tag resource, metrics, and log file exclusively; the
//! only shared state is the shutdown signal. The lifecycle is
//! `Acquiring -> Operating -> (Failing -> Acquiring) -> Terminated`, with
//! `Terminated` reached only by observing the signal. Every tag error is
//! recovered locally: the resource is torn down and acquisition retried
//! after the backoff window, indefinitely.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::resource::Resource;
use super::signals::ShutdownSignal;
use crate::client::{TagClient, TagSpec, TagStatus};
use crate::config::{Timeouts, WorkerIdentity};
use crate::metrics::{WorkerLog, WorkerMetrics, WorkerSummary};
use crate::utils::TagError;

/// Lifecycle states of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Acquiring,
    Operating,
    Failing,
    Terminated,
}

/// Cyclic bounded counter over `[0, 500]`.
#[inline]
pub fn next_value(value: i32) -> i32 {
    if value >= 500 {
        0
    } else {
        value + 1
    }
}

pub struct Worker<C: TagClient> {
    identity: WorkerIdentity,
    client: Arc<C>,
    shutdown: Arc<ShutdownSignal>,
    timeouts: Timeouts,
    spec: TagSpec,
    resource: Option<Resource<C>>,
    metrics: WorkerMetrics,
    log: WorkerLog,
    /// Cycle number for log lines, counted from 1 and including failed cycles
    cycle: u64,
    /// The very first acquisition attempt skips the backoff window
    first_attempt: bool,
}

impl<C: TagClient> Worker<C> {
    pub fn new(
        identity: WorkerIdentity,
        client: Arc<C>,
        shutdown: Arc<ShutdownSignal>,
        timeouts: Timeouts,
        log: WorkerLog,
    ) -> Self {
        let spec = TagSpec::for_worker(&identity);
        Self {
            identity,
            client,
            shutdown,
            timeouts,
            spec,
            resource: None,
            metrics: WorkerMetrics::new(),
            log,
            cycle: 1,
            first_attempt: true,
        }
    }

    /// Drive the state machine until the shutdown signal is observed.
    ///
    /// The signal is checked once at the top of each state transition, never
    /// inside an in-flight bounded I/O call: worst-case shutdown latency is
    /// one operation timeout plus one backoff window.
    pub fn run(mut self) -> WorkerSummary {
        debug!("worker {} starting", self.identity.id);
        self.log.line(format_args!(
            "--- Test {} updating {} elements starting at index {}",
            self.identity.id,
            self.identity.elements,
            self.identity.start_index()
        ));

        let mut state = WorkerState::Acquiring;
        loop {
            if self.shutdown.is_set() {
                state = WorkerState::Terminated;
            }
            state = match state {
                WorkerState::Acquiring => self.acquire_once(),
                WorkerState::Operating => self.run_cycle(),
                WorkerState::Failing => self.tear_down(),
                WorkerState::Terminated => break,
            };
        }

        self.finish()
    }

    /// One acquisition attempt, preceded by the backoff window on retries.
    fn acquire_once(&mut self) -> WorkerState {
        if !self.first_attempt {
            let interrupted = self
                .shutdown
                .wait_interruptible(self.timeouts.create_timeout, self.timeouts.backoff_poll);
            if interrupted {
                return WorkerState::Acquiring;
            }
        }
        self.first_attempt = false;

        self.log.line(format_args!(
            "--- Test {}, creating tag with string {}",
            self.identity.id, self.spec
        ));

        match Resource::acquire(Arc::clone(&self.client), &self.spec, &self.timeouts) {
            Ok(resource) => {
                self.resource = Some(resource);
                WorkerState::Operating
            }
            Err(err) => {
                self.log.line(format_args!(
                    "!!! Test {}, cycle {}, error ({}) creating tag, retrying in {}ms",
                    self.identity.id,
                    self.cycle,
                    err,
                    self.timeouts.create_timeout.as_millis()
                ));
                WorkerState::Acquiring
            }
        }
    }

    /// One bounded read-modify-write cycle over this worker's element range.
    fn run_cycle(&mut self) -> WorkerState {
        let cycle = self.cycle;
        self.cycle += 1;

        let Some(resource) = self.resource.as_mut() else {
            return WorkerState::Acquiring;
        };

        let start = Instant::now();
        let result = Self::cycle_io(
            resource,
            &mut self.log,
            self.identity.id,
            cycle,
            self.identity.elements,
            &self.timeouts,
        );
        let elapsed = start.elapsed();

        // Failed cycles count toward cumulative I/O time too.
        self.metrics.record_io(elapsed);

        match result {
            Ok(()) => {
                self.metrics.record_success(elapsed);
                self.log.line(format_args!(
                    "*** Test {}, cycle {} updated {} elements in {}ms",
                    self.identity.id,
                    cycle,
                    self.identity.elements,
                    elapsed.as_millis()
                ));
                WorkerState::Operating
            }
            Err(err) => {
                self.log.line(format_args!(
                    "!!! Test {}, cycle {}, {}",
                    self.identity.id, cycle, err
                ));
                WorkerState::Failing
            }
        }
    }

    fn cycle_io(
        resource: &mut Resource<C>,
        log: &mut WorkerLog,
        id: u32,
        cycle: u64,
        elements: u32,
        timeouts: &Timeouts,
    ) -> Result<(), TagError> {
        resource.read(timeouts.data_timeout)?;

        for i in 0..elements {
            let value = resource.get_i32(i);
            let next = next_value(value);
            // Best-effort: an element write failure is logged, never fatal
            // to the cycle.
            if let TagStatus::Err(code) = resource.set_i32(i, next) {
                log.line(format_args!(
                    "!!! Test {}, cycle {}, element {} write skipped: {}",
                    id, cycle, i, code
                ));
            }
        }

        resource.write(timeouts.data_timeout)
    }

    /// Destroy the failed resource and fall back to acquisition.
    fn tear_down(&mut self) -> WorkerState {
        if let Some(resource) = self.resource.take() {
            resource.release();
        }
        self.log.line(format_args!(
            "!!! Test {}, closing tag, retrying in {}ms",
            self.identity.id,
            self.timeouts.create_timeout.as_millis()
        ));
        WorkerState::Acquiring
    }

    /// Destroy any live resource, write the final summary line, and flush
    /// the log.
    fn finish(mut self) -> WorkerSummary {
        if let Some(resource) = self.resource.take() {
            resource.release();
        }

        self.log.line(format_args!(
            "*** Test {} terminating after {} successful cycles and an average of {}ms per cycle",
            self.identity.id,
            self.metrics.iterations,
            self.metrics.average_io().as_millis()
        ));
        if let Err(err) = self.log.close() {
            debug!("worker {} log flush failed: {}", self.identity.id, err);
        }
        debug!(
            "worker {} terminated after {} successful cycles",
            self.identity.id, self.metrics.iterations
        );

        WorkerSummary {
            id: self.identity.id,
            metrics: self.metrics,
        }
    }
}
