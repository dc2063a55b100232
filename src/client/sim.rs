//! Simulated tag client
//!
//! In-process stand-in for the real remote client: a shared "remote" array of
//! atomics plus a per-handle staging buffer, so concurrent workers exercise
//! the same sharing the real client would see. Fault injection covers the
//! failure paths the harness is built to recover from: creation that always
//! fails, creation that stays pending, and probabilistic read/write errors.

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use super::{ErrorCode, TagClient, TagSpec, TagStatus};

/// Fault-injection knobs for the simulated client.
#[derive(Debug, Clone, Copy)]
pub struct SimFaults {
    /// Every create call returns no handle
    pub fail_create: bool,
    /// Status polls reporting `Pending` before a handle becomes ready
    pub pending_polls: u32,
    /// Per-mille probability that a read or write call fails
    pub io_failure_permille: u32,
    /// Fixed latency added to every read and write call
    pub io_latency: Duration,
}

impl Default for SimFaults {
    fn default() -> Self {
        Self {
            fail_create: false,
            pending_polls: 0,
            io_failure_permille: 0,
            io_latency: Duration::ZERO,
        }
    }
}

/// Handle to one simulated tag: a window into the shared remote array plus
/// the tag's in-memory buffer. Owned by exactly one worker.
pub struct SimHandle {
    start: usize,
    buffer: Mutex<Vec<i32>>,
    polls_left: AtomicU32,
}

/// Simulated remote tag client.
///
/// The element store is shared by every handle the client creates, which is
/// exactly the multi-thread access pattern the harness stress-tests.
pub struct SimClient {
    store: Vec<AtomicI32>,
    faults: SimFaults,
}

impl SimClient {
    /// Client with `total_elements` remote elements and no faults.
    pub fn healthy(total_elements: usize) -> Self {
        Self::with_faults(total_elements, SimFaults::default())
    }

    /// Client with explicit fault injection.
    pub fn with_faults(total_elements: usize, faults: SimFaults) -> Self {
        let store = (0..total_elements).map(|_| AtomicI32::new(0)).collect();
        Self { store, faults }
    }

    /// Client whose create calls always fail.
    pub fn failing_create() -> Self {
        Self::with_faults(
            0,
            SimFaults {
                fail_create: true,
                ..SimFaults::default()
            },
        )
    }

    /// Current remote value of one element, for test assertions.
    pub fn remote_value(&self, index: usize) -> i32 {
        self.store[index].load(Ordering::Relaxed)
    }

    fn roll_io_failure(&self) -> bool {
        self.faults.io_failure_permille > 0
            && fastrand::u32(0..1000) < self.faults.io_failure_permille
    }

    fn simulate_latency(&self) {
        if !self.faults.io_latency.is_zero() {
            thread::sleep(self.faults.io_latency);
        }
    }
}

impl TagClient for SimClient {
    type Handle = SimHandle;

    fn create(&self, spec: &TagSpec) -> Option<SimHandle> {
        if self.faults.fail_create {
            return None;
        }

        let start = spec.start_index as usize;
        let count = spec.elem_count as usize;
        if start + count > self.store.len() {
            return None;
        }

        Some(SimHandle {
            start,
            buffer: Mutex::new(vec![0; count]),
            polls_left: AtomicU32::new(self.faults.pending_polls),
        })
    }

    fn status(&self, handle: &SimHandle) -> TagStatus {
        if handle.polls_left.load(Ordering::Relaxed) == 0 {
            TagStatus::Ok
        } else {
            handle.polls_left.fetch_sub(1, Ordering::Relaxed);
            TagStatus::Pending
        }
    }

    fn read(&self, handle: &SimHandle, _timeout: Duration) -> TagStatus {
        self.simulate_latency();
        if self.roll_io_failure() {
            return TagStatus::Err(ErrorCode::Timeout);
        }

        let mut buffer = handle.buffer.lock();
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = self.store[handle.start + i].load(Ordering::Relaxed);
        }
        TagStatus::Ok
    }

    fn write(&self, handle: &SimHandle, _timeout: Duration) -> TagStatus {
        self.simulate_latency();
        if self.roll_io_failure() {
            return TagStatus::Err(ErrorCode::Timeout);
        }

        let buffer = handle.buffer.lock();
        for (i, value) in buffer.iter().enumerate() {
            self.store[handle.start + i].store(*value, Ordering::Relaxed);
        }
        TagStatus::Ok
    }

    fn get_i32(&self, handle: &SimHandle, byte_offset: usize) -> i32 {
        let index = byte_offset / 4;
        handle.buffer.lock().get(index).copied().unwrap_or(0)
    }

    fn set_i32(&self, handle: &SimHandle, byte_offset: usize, value: i32) -> TagStatus {
        let index = byte_offset / 4;
        match handle.buffer.lock().get_mut(index) {
            Some(slot) => {
                *slot = value;
                TagStatus::Ok
            }
            None => TagStatus::Err(ErrorCode::Remote),
        }
    }

    fn destroy(&self, handle: SimHandle) {
        drop(handle);
    }
}
