//! Worker lifecycle and run coordination
//!
//! The harness core: the shared shutdown signal, the per-worker tag resource
//! wrapper, the worker state machine, and the coordinator that spawns,
//! bounds, and joins the workers.

pub mod coordinator;
pub mod resource;
pub mod signals;
pub mod worker;

pub use coordinator::{run, ExitStatus};
pub use resource::{Resource, ResourceState};
pub use signals::ShutdownSignal;
pub use worker::Worker;
