//! Clean command implementation
//!
//! Drops the staging relations left behind by runs: the rejected rows of a
//! failed run, or the previous generation after a successful swap.

use anyhow::Result;

use crate::cli::{CleanArgs, GlobalArgs};
use crate::commands::common::{self, ExitCode};
use crate::context::RuntimeContext;

/// Execute the clean command
pub async fn execute(args: &CleanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let jobs = common::select_jobs(&ctx.project, args.jobs.as_deref())?;

    if args.dry_run {
        println!("Dry run - would drop the following staging relations:");
    } else {
        println!("Cleaning project: {}", ctx.project.config.name);
    }

    let mut dropped_count = 0;
    let mut skipped_count = 0;
    let mut failed_count = 0;

    for job in &jobs {
        let staging = job.staging();

        match ctx.db.relation_exists(&staging).await {
            Ok(true) => {}
            Ok(false) => {
                if global.verbose {
                    println!("  Skipping (not found): {}", staging);
                }
                skipped_count += 1;
                continue;
            }
            Err(e) => {
                log::warn!("Could not look up {}: {}", staging, e);
                eprintln!("  Failed to check {}: {}", staging, e);
                failed_count += 1;
                continue;
            }
        }

        if args.dry_run {
            println!("  Would drop: {}", staging);
            dropped_count += 1;
            continue;
        }

        match ctx.db.drop_if_exists(&staging).await {
            Ok(()) => {
                println!("  Dropped: {}", staging);
                dropped_count += 1;
            }
            Err(e) => {
                log::warn!("Failed to drop {}: {}", staging, e);
                eprintln!("  Failed to drop {}: {}", staging, e);
                failed_count += 1;
            }
        }
    }

    println!();
    if args.dry_run {
        println!(
            "Would drop {} relation(s), {} not found",
            dropped_count, skipped_count
        );
    } else {
        println!(
            "Dropped {} relation(s), {} skipped, {} failed",
            dropped_count, skipped_count, failed_count
        );
    }

    if failed_count > 0 {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "clean_test.rs"]
mod tests;
