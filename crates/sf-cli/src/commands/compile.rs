//! Compile command implementation
//!
//! Prints, per job, the statements a run would send to storage. Nothing is
//! executed; the query is only checked with the configured dialect.

use anyhow::Result;
use sf_check::{plan_checks, CheckKind};
use sf_db::sql;
use sf_sql::{check_select_query, SqlParser};
use sf_swap::SwapJob;

use crate::cli::{CompileArgs, GlobalArgs};
use crate::commands::common::{self, ExitCode};
use crate::context::Project;

/// Execute the compile command
pub async fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;
    let jobs = common::select_jobs(&project, args.jobs.as_deref())?;
    let parser = SqlParser::for_dialect(project.config.dialect);

    let mut failures = 0;
    for job in &jobs {
        if let Err(e) = check_select_query(&parser, &job.select_sql) {
            eprintln!("✗ {}: {}", job.name, e);
            failures += 1;
            continue;
        }
        println!("{}", render_job(job));
    }

    if failures > 0 {
        eprintln!(
            "{} of {} job(s) failed to compile ({} dialect)",
            failures,
            jobs.len(),
            parser.dialect_name()
        );
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Statements a run of `job` would execute, grouped by stage.
pub(crate) fn render_job(job: &SwapJob) -> String {
    let staging = job.staging();
    let mut out = format!("-- job: {} ({})\n", job.name, job.target);

    if !job.pre_hook.is_empty() {
        out.push_str("\n-- pre_hook\n");
        for statement in &job.pre_hook {
            push_statement(&mut out, statement);
        }
    }

    out.push_str("\n-- staging\n");
    push_statement(&mut out, &sql::create_table_as(&staging, &job.select_sql, true));

    out.push_str("\n-- validation\n");
    for check in plan_checks(&staging, &job.validation) {
        let statement = match check.kind {
            CheckKind::PrimaryKey => check.sql,
            CheckKind::TotalRows | CheckKind::DistinctRows => sql::count_rows(&check.sql),
        };
        push_statement(&mut out, &statement);
    }

    out.push_str("\n-- provisioning (if target is missing)\n");
    push_statement(&mut out, &sql::create_empty_like(&job.target, &staging));

    out.push_str("\n-- swap (one transaction)\n");
    for statement in sql::swap_renames(&job.target, &staging) {
        push_statement(&mut out, &statement);
    }

    out
}

fn push_statement(out: &mut String, statement: &str) {
    out.push_str(sql::strip_terminator(statement.trim()));
    out.push_str(";\n");
}
