//! Command-line interface parsing for the PR cache tool
//!
//! This module handles parsing of CLI arguments using clap: one subcommand
//! per cache operation, plus global flags for the cache root location and
//! JSON output.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default cache root, resolved relative to the invocation directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// PR cache CLI - manage the TTL file cache behind the review tooling
#[derive(Parser, Debug)]
#[command(name = "prcache")]
#[command(about = "Manage the on-disk TTL cache (model docs, PR analysis, link validation)")]
#[command(version)]
pub struct Cli {
    /// Cache root directory (default: ./cache)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output reports as JSON
    #[arg(long, global = true, short = 'j')]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove entries older than their bucket's TTL
    Clean,

    /// Remove all entries from every bucket, regardless of age
    Clear,

    /// Show entry counts, sizes, TTLs, and oldest-entry ages per bucket
    Stats,

    /// List every cached entry with its size and age
    List,

    /// Remove pr-analysis entries whose filename contains KEY
    Invalidate {
        /// Substring to match against filenames (e.g. a commit SHA)
        key: String,
    },
}

impl Cli {
    /// Resolves the cache root: the --cache-dir override if given, otherwise
    /// the default relative path.
    pub fn cache_root(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_clean() {
        let cli = Cli::parse_from(["prcache", "clean"]);
        assert!(matches!(cli.command, Commands::Clean));
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parse_clear_and_stats_and_list() {
        assert!(matches!(
            Cli::parse_from(["prcache", "clear"]).command,
            Commands::Clear
        ));
        assert!(matches!(
            Cli::parse_from(["prcache", "stats"]).command,
            Commands::Stats
        ));
        assert!(matches!(
            Cli::parse_from(["prcache", "list"]).command,
            Commands::List
        ));
    }

    #[test]
    fn test_cli_parse_invalidate_with_key() {
        let cli = Cli::parse_from(["prcache", "invalidate", "abc123"]);
        match cli.command {
            Commands::Invalidate { key } => assert_eq!(key, "abc123"),
            other => panic!("Expected Invalidate, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_invalidate_without_key_is_an_error() {
        let result = Cli::try_parse_from(["prcache", "invalidate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_no_subcommand_is_an_error() {
        let result = Cli::try_parse_from(["prcache"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_unknown_subcommand_is_an_error() {
        let result = Cli::try_parse_from(["prcache", "frobnicate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_root_defaults_to_relative_cache() {
        let cli = Cli::parse_from(["prcache", "stats"]);
        assert_eq!(cli.cache_root(), PathBuf::from("cache"));
    }

    #[test]
    fn test_cache_root_honours_override() {
        let cli = Cli::parse_from(["prcache", "--cache-dir", "/tmp/pc", "stats"]);
        assert_eq!(cli.cache_root(), PathBuf::from("/tmp/pc"));
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["prcache", "stats", "--json"]);
        assert!(cli.json);
        let cli = Cli::parse_from(["prcache", "stats", "--cache-dir", "elsewhere"]);
        assert_eq!(cli.cache_root(), PathBuf::from("elsewhere"));
    }
}
