//! Command-line argument parsing
//!
//! The surface is deliberately minimal: three positional integers and nothing
//! else. Malformed or missing arguments print the usage line and the process
//! exits 0 without running.

use clap::Parser;

/// Concurrency stress test for a shared remote tag client
#[derive(Parser, Debug, Clone)]
#[command(name = "tag-stress")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Number of worker threads
    pub workers: u32,

    /// Elements handled by each worker
    pub elements_per_worker: u32,

    /// Seconds to run before shutdown
    pub duration_secs: u64,
}

impl CliArgs {
    pub const USAGE: &'static str =
        "Usage: tag-stress <workers> <elements per worker> <seconds to run>";

    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_three_positional_args() {
        let args = CliArgs::parse_from(["tag-stress", "4", "10", "30"]);
        assert_eq!(args.workers, 4);
        assert_eq!(args.elements_per_worker, 10);
        assert_eq!(args.duration_secs, 30);
    }

    #[test]
    fn test_missing_args_fail_to_parse() {
        assert!(CliArgs::try_parse_from(["tag-stress", "4", "10"]).is_err());
        assert!(CliArgs::try_parse_from(["tag-stress"]).is_err());
    }

    #[test]
    fn test_malformed_args_fail_to_parse() {
        assert!(CliArgs::try_parse_from(["tag-stress", "four", "10", "30"]).is_err());
        assert!(CliArgs::try_parse_from(["tag-stress", "-1", "10", "30"]).is_err());
    }
}
