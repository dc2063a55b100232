//! Structured tag specification
//!
//! The external client addresses tags with a raw `key=value&...` string. The
//! structured form here carries the same fields (protocol, gateway, routing
//! path, element size/count, symbolic name, start index) and is serialized to
//! the string form only at the client boundary, via `Display`.

use std::fmt;
use std::ops::Range;

use crate::config::WorkerIdentity;

/// Specification of one remote tag resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub protocol: String,
    pub gateway: String,
    pub path: String,
    pub cpu: String,
    /// Element size in bytes
    pub elem_size: u32,
    /// Number of elements addressed by this tag
    pub elem_count: u32,
    /// Symbolic name of the remote array
    pub name: String,
    /// Index of the first addressed element within the remote array
    pub start_index: u32,
}

impl TagSpec {
    /// Spec addressing the disjoint element range of one worker identity.
    ///
    /// Ranges are `[id * elements, (id + 1) * elements)`, so no two workers
    /// of the same run ever overlap.
    pub fn for_worker(identity: &WorkerIdentity) -> Self {
        Self {
            protocol: "ab_eip".to_string(),
            gateway: "10.206.1.39".to_string(),
            path: "1,5".to_string(),
            cpu: "lgx".to_string(),
            elem_size: 4,
            elem_count: identity.elements,
            name: "TestBigArray".to_string(),
            start_index: identity.start_index(),
        }
    }

    /// Element indices addressed by this spec.
    pub fn range(&self) -> Range<u32> {
        self.start_index..self.start_index + self.elem_count
    }
}

impl fmt::Display for TagSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protocol={}&gateway={}&path={}&cpu={}&elem_size={}&elem_count={}&name={}[{}]",
            self.protocol,
            self.gateway,
            self.path,
            self.cpu,
            self.elem_size,
            self.elem_count,
            self.name,
            self.start_index
        )
    }
}
