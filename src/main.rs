use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use edfsim::cli::{Cli, OutputFormat};
use edfsim::input;
use edfsim::output;
use edfsim::taskset::{build_tasks, collect_resources, expand, ExpandedTaskSet};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let parsed = input::load(&cli.path).with_context(|| format!("loading {}", cli.path.display()))?;

    let (start, end, releases) = match parsed.plan {
        input::ReleasePlan::Window { start, end } => {
            (cli.start.unwrap_or(start), cli.end.unwrap_or(end), None)
        }
        input::ReleasePlan::Releases { releases, start, end } => {
            (cli.start.unwrap_or(start), cli.end.unwrap_or(end), Some(releases))
        }
    };

    let (tasks, mut warnings) = build_tasks(parsed.tasks);
    let resources = collect_resources(&tasks);
    let (jobs, events, expand_warnings) = expand(&tasks, start, end, releases.as_deref());
    warnings.extend(expand_warnings);

    if cli.format == OutputFormat::Human {
        output::print_tasks(&tasks);
        output::print_jobs(&jobs);
    }
    output::print_warnings(&warnings);

    let expanded = ExpandedTaskSet { tasks, resources, jobs, events };
    let trace = edfsim::scheduler::run(expanded, cli.protocol.into());

    match cli.format {
        OutputFormat::Human => output::print_human(trace.records()),
        OutputFormat::Json => output::print_json(trace.records()).context("serializing trace to JSON")?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
