//! Run command implementation

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sf_swap::{ErrorCategory, OperationOutcome, SwapOperation};
use std::time::Instant;

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::{self, ExitCode};
use crate::context::RuntimeContext;

/// Exit code when at least one job broke a validation rule
const EXIT_DATA_QUALITY: i32 = 1;

/// Exit code when at least one job hit a storage or query fault
const EXIT_INFRASTRUCTURE: i32 = 2;

/// Contents of `target/run_results.json`
#[derive(Debug, Serialize)]
struct RunResults {
    timestamp: DateTime<Utc>,
    elapsed_secs: f64,
    target: Option<String>,
    success_count: usize,
    failure_count: usize,
    skipped_count: usize,
    results: Vec<OperationOutcome>,
}

/// Execute the run command
pub async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let start_time = Instant::now();
    let ctx = RuntimeContext::new(global).await?;
    let jobs = common::select_jobs(&ctx.project, args.jobs.as_deref())?;
    let json_mode = args.output == OutputFormat::Json;

    if !json_mode {
        println!("Running {} job(s)...\n", jobs.len());
    }

    let operation = SwapOperation::new(&*ctx.db).with_dialect(ctx.project.config.dialect);
    let mut outcomes: Vec<OperationOutcome> = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let outcome = operation.run(job).await;
        if !json_mode {
            print_outcome(&outcome);
        }
        let failed = !outcome.success;
        outcomes.push(outcome);
        if failed && args.fail_fast {
            break;
        }
    }

    let success_count = outcomes.iter().filter(|o| o.success).count();
    let failure_count = outcomes.len() - success_count;
    let results = RunResults {
        timestamp: Utc::now(),
        elapsed_secs: start_time.elapsed().as_secs_f64(),
        target: ctx.target.clone(),
        success_count,
        failure_count,
        skipped_count: jobs.len() - outcomes.len(),
        results: outcomes,
    };
    common::write_json_results(&ctx.project.target_dir().join("run_results.json"), &results)?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        if results.skipped_count > 0 {
            println!(
                "  {} job(s) skipped due to --fail-fast",
                results.skipped_count
            );
        }
        println!();
        println!(
            "Completed: {} succeeded, {} failed",
            success_count, failure_count
        );
        println!("Total time: {}ms", start_time.elapsed().as_millis());
    }

    match exit_code_for(&results.results) {
        Some(code) => Err(ExitCode(code).into()),
        None => Ok(()),
    }
}

/// Infrastructure failures outrank data-quality failures.
fn exit_code_for(outcomes: &[OperationOutcome]) -> Option<i32> {
    let categories: Vec<ErrorCategory> = outcomes.iter().filter_map(|o| o.category()).collect();
    if categories.contains(&ErrorCategory::Infrastructure) {
        Some(EXIT_INFRASTRUCTURE)
    } else if categories.contains(&ErrorCategory::DataQuality) {
        Some(EXIT_DATA_QUALITY)
    } else {
        None
    }
}

fn print_outcome(outcome: &OperationOutcome) {
    match &outcome.error {
        None => {
            let rows = outcome
                .staged_rows
                .map(|n| format!(", {} rows", n))
                .unwrap_or_default();
            let created = if outcome.target_created {
                " (created)"
            } else {
                ""
            };
            println!(
                "  ✓ {} -> {}{}{} [{}ms]",
                outcome.job, outcome.target, created, rows, outcome.duration_ms
            );
        }
        Some(error) => {
            println!(
                "  ✗ {} -> {} failed in {} [{}ms]",
                outcome.job,
                outcome.target,
                error.stage.component(),
                outcome.duration_ms
            );
            println!("      {}", error.message);
            if error.needs_operator {
                println!(
                    "      inspect {} and {} before the next run",
                    outcome.target, outcome.staging
                );
            }
        }
    }
    for warning in &outcome.warnings {
        println!("      warning: {}", warning);
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
