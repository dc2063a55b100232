//! tag-stress library
//!
//! Concurrency stress-test harness for a shared remote tag client. A
//! configurable number of worker threads each repeatedly acquire a tag
//! resource, run bounded read-modify-write cycles over a disjoint element
//! range, and report per-cycle timing until the run deadline expires.

pub mod client;
pub mod config;
pub mod harness;
pub mod metrics;
pub mod utils;
