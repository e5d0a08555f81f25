use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use lac_cli::ingest::build_table_set;
use lac_cli::render::{ignore_broken_pipe, rule_list_table, write_report};
use lac_model::TableSet;
use lac_report::{Report, ReportBuilder};
use lac_rules::load_registry;
use lac_validate::{Orchestrator, Registry, RunOptions, RunResult};

use crate::cli::{InputArgs, ListArgs, OutputFormatArg, RuleArgs, RunArgs};

pub fn run_list(args: &ListArgs) -> Result<()> {
    let registry = load_registry(&args.ruleset).context("load rule set")?;
    write_stdout(|out| {
        writeln!(out, "{} ({} rules)", registry.version(), registry.len())?;
        writeln!(out, "{}", rule_list_table(&registry))
    })
}

/// Run a rule set and print the report. Returns the report so the caller can
/// pick an exit code.
pub fn run_validation(args: &RunArgs) -> Result<Report> {
    let input = &args.input;
    let registry = load_registry(&input.ruleset).context("load rule set")?;
    let tables = load_tables(input)?;

    let mut options = RunOptions::default();
    if !args.select.is_empty() {
        options = options.with_selection(args.select.iter().map(String::as_str));
    }
    if let Some(workers) = args.workers {
        options = options.with_workers(workers);
    }
    if let Some(limit) = args.max_failures {
        options = options.with_failure_threshold(limit);
    }
    if let Some(secs) = args.timeout_secs {
        options = options.with_deadline(Duration::from_secs(secs));
    }

    let span = info_span!("run", ruleset = %registry.version(), workers = options.workers());
    let _guard = span.enter();
    let start = Instant::now();
    let run = Orchestrator::new(&registry).with_options(options).run(&tables);
    log_run(&run, start);

    emit(&registry, &run, &tables, input)
}

/// Run one rule regardless of any selection.
pub fn run_rule(args: &RuleArgs) -> Result<Report> {
    let input = &args.input;
    let registry = load_registry(&input.ruleset).context("load rule set")?;
    let tables = load_tables(input)?;

    let span = info_span!("rule", code = %args.code);
    let _guard = span.enter();
    let start = Instant::now();
    let run = Orchestrator::new(&registry)
        .run_single(&args.code, &tables)
        .with_context(|| format!("run rule {}", args.code))?;
    log_run(&run, start);

    emit(&registry, &run, &tables, input)
}

fn load_tables(input: &InputArgs) -> Result<TableSet> {
    let tables = build_table_set(&input.tables, &input.metadata, input.postcodes.as_deref())
        .context("load tables")?;
    info!(tables = tables.len(), "loaded tables");
    Ok(tables)
}

fn log_run(run: &RunResult, start: Instant) {
    info!(
        succeeded = run.summary.succeeded,
        skipped = run.summary.skipped,
        failed = run.summary.failed,
        complete = run.is_complete(),
        elapsed_ms = start.elapsed().as_millis(),
        "run finished"
    );
}

fn emit(
    registry: &Registry,
    run: &RunResult,
    tables: &TableSet,
    input: &InputArgs,
) -> Result<Report> {
    let report = ReportBuilder::new(registry)
        .entity_key(input.entity_key.as_str())
        .build(run, tables);
    match input.format {
        OutputFormatArg::Table => write_stdout(|out| write_report(out, &report, input.max_rows))?,
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialize report")?;
            write_stdout(|out| writeln!(out, "{json}"))?;
        }
    }
    Ok(report)
}

fn write_stdout<F>(write: F) -> Result<()>
where
    F: FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>,
{
    let mut out = io::stdout().lock();
    ignore_broken_pipe(write(&mut out).and_then(|()| out.flush())).context("write to stdout")
}
