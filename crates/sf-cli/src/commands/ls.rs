//! List command implementation

use anyhow::Result;
use serde::Serialize;
use sf_core::{EmptyPolicy, JobConfig};

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common;
use crate::context::Project;

/// Job information for display
#[derive(Debug, Serialize)]
struct JobInfo {
    name: String,
    target: String,
    staging: String,
    primary_key: Vec<String>,
    on_empty: EmptyPolicy,
    /// `select_sql` or the path of the SQL file
    source: String,
}

impl From<&JobConfig> for JobInfo {
    fn from(job: &JobConfig) -> Self {
        let target = job.target();
        Self {
            name: job.name().to_string(),
            staging: target.staging().to_string(),
            target: target.to_string(),
            primary_key: job
                .primary_key
                .as_ref()
                .map(|pk| pk.columns().iter().map(|c| c.to_string()).collect())
                .unwrap_or_default(),
            on_empty: job.on_empty,
            source: job
                .sql_file
                .clone()
                .unwrap_or_else(|| "select_sql".to_string()),
        }
    }
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let jobs: Vec<JobInfo> = project.config.jobs.iter().map(JobInfo::from).collect();

    match args.output {
        LsOutput::Table => print_table(&jobs),
        LsOutput::Json => println!("{}", serde_json::to_string_pretty(&jobs)?),
    }
    Ok(())
}

fn print_table(jobs: &[JobInfo]) {
    if jobs.is_empty() {
        println!("No jobs configured.");
        return;
    }

    let headers = ["NAME", "TARGET", "STAGING", "PRIMARY_KEY", "ON_EMPTY", "SOURCE"];
    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            vec![
                job.name.clone(),
                job.target.clone(),
                job.staging.clone(),
                if job.primary_key.is_empty() {
                    "-".to_string()
                } else {
                    job.primary_key.join(", ")
                },
                job.on_empty.to_string(),
                job.source.clone(),
            ]
        })
        .collect();
    common::print_table(&headers, &rows);
    println!("\n{} job(s)", jobs.len());
}
