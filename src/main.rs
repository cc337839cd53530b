use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod exec;
mod orchestrator;
mod plan;
mod report;

use cli::RootArgs;
use exec::SystemRunner;
use plan::ProvisionPlan;
use report::StepOutcome;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let plan = match &args.config {
        Some(path) => config::load_plan(path)?,
        None => ProvisionPlan::builtin(),
    };
    if let Some(errors) = plan.validate() {
        return Err(anyhow!("invalid provisioning plan: {}", errors.join("; ")));
    }

    let mut runner = SystemRunner;
    let report = orchestrator::run(&plan, &mut runner)?;

    if args.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        // One status line per provisioned service, in plan order; nothing
        // for services whose artifact is missing.
        for (entry, step) in plan.entries().iter().zip(&report.steps) {
            if step.outcome == StepOutcome::Provisioned {
                println!("{}", entry.success_message());
            }
        }
    }

    // Best-effort run: step failures are reported, never escalated to the
    // process exit code.
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("DBPROV_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
