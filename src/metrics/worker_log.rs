//! Per-worker log sink
//!
//! One plain-text file per worker, named from its identity, truncated at
//! worker start and flushed when the worker terminates. Append-only within
//! a run.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::WorkerIdentity;

pub struct WorkerLog {
    writer: BufWriter<File>,
}

impl WorkerLog {
    /// Open (truncating) the log file for one worker identity.
    pub fn create(dir: &Path, identity: &WorkerIdentity) -> io::Result<Self> {
        let file = File::create(dir.join(identity.log_name()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Append one line. Best-effort: a failed log write never aborts a cycle.
    pub fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.writer.write_fmt(args);
        let _ = self.writer.write_all(b"\n");
    }

    /// Flush buffered lines to disk.
    pub fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_lines_to_identity_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let identity = WorkerIdentity { id: 4, elements: 2 };

        let mut log = WorkerLog::create(dir.path(), &identity).unwrap();
        log.line(format_args!("--- Test {} starting", identity.id));
        log.line(format_args!("*** Test {} done", identity.id));
        log.close().unwrap();

        let content = std::fs::read_to_string(dir.path().join("test-4.log")).unwrap();
        assert_eq!(content, "--- Test 4 starting\n*** Test 4 done\n");
    }

    #[test]
    fn test_recreate_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let identity = WorkerIdentity { id: 1, elements: 1 };

        let mut log = WorkerLog::create(dir.path(), &identity).unwrap();
        log.line(format_args!("first run"));
        log.close().unwrap();
        drop(log);

        let mut log = WorkerLog::create(dir.path(), &identity).unwrap();
        log.line(format_args!("second run"));
        log.close().unwrap();

        let content = std::fs::read_to_string(dir.path().join("test-1.log")).unwrap();
        assert_eq!(content, "second run\n");
    }
}
