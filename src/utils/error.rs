//! Error types for tag-stress

use std::io;
use thiserror::Error;

use crate::client::ErrorCode;

/// Top-level harness error
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Per-operation tag errors.
///
/// All of these are recovered locally inside the worker: logged, the
/// resource torn down, and the acquisition retried after the backoff
/// window. None escalate to the coordinator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagError {
    /// Resource could not be created, or failed during asynchronous setup
    #[error("tag could not be created: {0}")]
    Acquire(ErrorCode),

    /// Asynchronous creation never completed
    #[error("tag creation still pending after {0}ms")]
    PendingTimeout(u64),

    /// Bounded read failed or timed out
    #[error("read failed: {0}")]
    Read(ErrorCode),

    /// Bounded write failed or timed out
    #[error("write failed: {0}")]
    Write(ErrorCode),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
