//! Tag resource wrapper
//!
//! Owns exactly one client handle. The unbound and creation-pending phases
//! live entirely inside [`Resource::acquire`]; a constructed resource is
//! always `Ready` and moves to `Failed` on any operation error. A resource
//! is never shared across threads; the owning worker destroys it on error
//! and acquires a fresh one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::{ErrorCode, TagClient, TagSpec, TagStatus};
use crate::config::Timeouts;
use crate::utils::TagError;

/// Lifecycle state of an acquired tag resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// Handle usable for read/write cycles
    Ready,
    /// An operation failed; the handle must be destroyed
    Failed,
}

/// One live tag resource, owned by one worker.
pub struct Resource<C: TagClient> {
    client: Arc<C>,
    handle: Option<C::Handle>,
    state: ResourceState,
    elem_size: u32,
}

impl<C: TagClient> std::fmt::Debug for Resource<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("state", &self.state)
            .field("elem_size", &self.elem_size)
            .field("has_handle", &self.handle.is_some())
            .finish()
    }
}

impl<C: TagClient> Resource<C> {
    /// Create the tag and poll its asynchronous creation status at
    /// `pending_poll` granularity until it reports ready, failing after
    /// `create_timeout`.
    pub fn acquire(client: Arc<C>, spec: &TagSpec, timeouts: &Timeouts) -> Result<Self, TagError> {
        let handle = match client.create(spec) {
            Some(handle) => handle,
            None => return Err(TagError::Acquire(ErrorCode::Create)),
        };

        let deadline = Instant::now() + timeouts.create_timeout;
        loop {
            match client.status(&handle) {
                TagStatus::Ok => {
                    return Ok(Self {
                        client,
                        handle: Some(handle),
                        state: ResourceState::Ready,
                        elem_size: spec.elem_size,
                    });
                }
                TagStatus::Pending => {
                    if Instant::now() >= deadline {
                        client.destroy(handle);
                        return Err(TagError::PendingTimeout(
                            timeouts.create_timeout.as_millis() as u64,
                        ));
                    }
                    std::thread::sleep(timeouts.pending_poll);
                }
                TagStatus::Err(code) => {
                    client.destroy(handle);
                    return Err(TagError::Acquire(code));
                }
            }
        }
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Bounded whole-buffer read. A timeout expiry is a failure status, not
    /// a cancellation; the call blocks until the client returns.
    pub fn read(&mut self, timeout: Duration) -> Result<(), TagError> {
        let Some(handle) = self.handle.as_ref() else {
            self.state = ResourceState::Failed;
            return Err(TagError::Read(ErrorCode::Closed));
        };
        match self.client.read(handle, timeout) {
            TagStatus::Ok => Ok(()),
            TagStatus::Pending => {
                self.state = ResourceState::Failed;
                Err(TagError::Read(ErrorCode::Timeout))
            }
            TagStatus::Err(code) => {
                self.state = ResourceState::Failed;
                Err(TagError::Read(code))
            }
        }
    }

    /// Bounded whole-buffer write.
    pub fn write(&mut self, timeout: Duration) -> Result<(), TagError> {
        let Some(handle) = self.handle.as_ref() else {
            self.state = ResourceState::Failed;
            return Err(TagError::Write(ErrorCode::Closed));
        };
        match self.client.write(handle, timeout) {
            TagStatus::Ok => Ok(()),
            TagStatus::Pending => {
                self.state = ResourceState::Failed;
                Err(TagError::Write(ErrorCode::Timeout))
            }
            TagStatus::Err(code) => {
                self.state = ResourceState::Failed;
                Err(TagError::Write(code))
            }
        }
    }

    /// Read one element from the in-memory buffer.
    pub fn get_i32(&self, index: u32) -> i32 {
        self.handle
            .as_ref()
            .map(|h| self.client.get_i32(h, self.byte_offset(index)))
            .unwrap_or_default()
    }

    /// Store one element into the in-memory buffer. Best-effort: callers log
    /// a failure but do not treat it as fatal to the cycle.
    pub fn set_i32(&self, index: u32, value: i32) -> TagStatus {
        match self.handle.as_ref() {
            Some(h) => self.client.set_i32(h, self.byte_offset(index), value),
            None => TagStatus::Err(ErrorCode::Closed),
        }
    }

    /// Destroy the underlying handle.
    pub fn release(mut self) {
        if let Some(handle) = self.handle.take() {
            self.client.destroy(handle);
        }
    }

    fn byte_offset(&self, index: u32) -> usize {
        (index * self.elem_size) as usize
    }
}

impl<C: TagClient> Drop for Resource<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.client.destroy(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{SimClient, SimFaults, TagSpec};
    use crate::config::WorkerIdentity;

    fn spec(id: u32, elements: u32) -> TagSpec {
        TagSpec::for_worker(&WorkerIdentity { id, elements })
    }

    fn short_timeouts() -> Timeouts {
        Timeouts {
            data_timeout: Duration::from_millis(100),
            create_timeout: Duration::from_millis(50),
            pending_poll: Duration::from_millis(1),
            backoff_poll: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_acquire_healthy_is_ready() {
        let client = Arc::new(SimClient::healthy(10));
        let resource = Resource::acquire(client, &spec(1, 2), &short_timeouts()).unwrap();
        assert_eq!(resource.state(), ResourceState::Ready);
    }

    #[test]
    fn test_acquire_waits_out_pending_polls() {
        let client = Arc::new(SimClient::with_faults(
            10,
            SimFaults {
                pending_polls: 3,
                ..SimFaults::default()
            },
        ));
        let resource = Resource::acquire(client, &spec(1, 2), &short_timeouts()).unwrap();
        assert_eq!(resource.state(), ResourceState::Ready);
    }

    #[test]
    fn test_acquire_fails_when_create_returns_no_handle() {
        let client = Arc::new(SimClient::failing_create());
        let err = Resource::acquire(client, &spec(1, 2), &short_timeouts()).unwrap_err();
        assert_eq!(err, TagError::Acquire(ErrorCode::Create));
    }

    #[test]
    fn test_acquire_times_out_on_endless_pending() {
        let client = Arc::new(SimClient::with_faults(
            10,
            SimFaults {
                pending_polls: u32::MAX,
                ..SimFaults::default()
            },
        ));
        let err = Resource::acquire(client, &spec(1, 2), &short_timeouts()).unwrap_err();
        assert_eq!(err, TagError::PendingTimeout(50));
    }

    #[test]
    fn test_cycle_through_wrapper() {
        let client = Arc::new(SimClient::healthy(10));
        let timeouts = short_timeouts();
        let mut resource =
            Resource::acquire(Arc::clone(&client), &spec(1, 2), &timeouts).unwrap();

        resource.read(timeouts.data_timeout).unwrap();
        assert_eq!(resource.get_i32(0), 0);
        assert!(resource.set_i32(0, 42).is_ok());
        resource.write(timeouts.data_timeout).unwrap();
        assert_eq!(client.remote_value(2), 42);

        resource.release();
    }

    #[test]
    fn test_read_failure_marks_failed() {
        let client = Arc::new(SimClient::with_faults(
            10,
            SimFaults {
                io_failure_permille: 1000,
                ..SimFaults::default()
            },
        ));
        let timeouts = short_timeouts();
        let mut resource = Resource::acquire(client, &spec(1, 2), &timeouts).unwrap();
        assert!(resource.read(timeouts.data_timeout).is_err());
        assert_eq!(resource.state(), ResourceState::Failed);
    }
}
