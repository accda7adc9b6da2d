//! PR cache CLI - administer the on-disk TTL cache buckets
//!
//! Parses the command line, dispatches to the cache manager, and renders the
//! resulting report as text or JSON.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::process;

use prcache::cache::{
    BucketListing, CacheManager, CacheStats, CleanReport, ClearReport, InvalidateReport,
};
use prcache::cli::{Cli, Commands};
use prcache::output::{human_duration, human_size, print_json};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = parse_or_exit();
    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Parses arguments, mapping clap outcomes onto the tool's exit codes.
///
/// `--help`/`--version` print and exit 0. Invoking with no subcommand prints
/// the full help (listing every subcommand); that and any other usage error
/// exit 1 without touching the filesystem.
fn parse_or_exit() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                process::exit(0);
            }
            ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = Cli::command().print_help();
                process::exit(1);
            }
            _ => {
                let _ = err.print();
                process::exit(1);
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let manager = CacheManager::new(cli.cache_root());

    match cli.command {
        Commands::Clean => {
            let report = manager.clean()?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_clean(&report);
            }
        }
        Commands::Clear => {
            let report = manager.clear()?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_clear(&report);
            }
        }
        Commands::Stats => {
            let stats = manager.stats()?;
            if cli.json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Commands::List => {
            let listings = manager.list()?;
            if cli.json {
                print_json(&listings)?;
            } else {
                print_listings(&listings);
            }
        }
        Commands::Invalidate { key } => {
            let report = manager.invalidate(&key)?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_invalidate(&report);
            }
        }
    }

    Ok(())
}

fn print_clean(report: &CleanReport) {
    for bucket in &report.buckets {
        println!("{}: removed {} expired entries", bucket.bucket, bucket.removed);
    }
    println!("Removed {} expired entries total", report.total_removed);
}

fn print_clear(report: &ClearReport) {
    for bucket in &report.buckets {
        println!("{}: cleared {} entries", bucket.bucket, bucket.removed);
    }
    println!("Cleared {} entries total", report.total_removed);
}

fn print_stats(stats: &CacheStats) {
    if stats.buckets.is_empty() {
        println!("No cache buckets exist yet");
        return;
    }
    for bucket in &stats.buckets {
        let oldest = bucket
            .oldest_age_secs
            .map(human_duration)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:>5} entries  {:>10}  ttl {:<6} oldest {}",
            bucket.bucket,
            bucket.entries,
            human_size(bucket.size_bytes),
            human_duration(bucket.ttl_secs),
            oldest
        );
    }
    println!(
        "{:<16} {:>5} entries  {:>10}",
        "total",
        stats.total_entries,
        human_size(stats.total_size_bytes)
    );
}

fn print_listings(listings: &[BucketListing]) {
    if listings.is_empty() {
        println!("No cache buckets exist yet");
        return;
    }
    for listing in listings {
        println!("{}:", listing.bucket);
        if listing.entries.is_empty() {
            println!("  (empty)");
            continue;
        }
        for entry in &listing.entries {
            println!(
                "  {:<44} {:>10}  {}",
                entry.name,
                human_size(entry.size_bytes),
                human_duration(entry.age_secs)
            );
        }
    }
}

fn print_invalidate(report: &InvalidateReport) {
    println!(
        "Removed {} entries matching '{}' from {}",
        report.removed, report.key, report.bucket
    );
}
