//! CLI argument parsing for the provisioning run.
//!
//! The CLI is intentionally thin: it wires a deterministic sequential run
//! without embedding policy, so the same core logic can be reused elsewhere.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint for the provisioning orchestrator.
///
/// Running with no arguments performs a full provisioning run over the
/// built-in service plan; `--config` swaps in a config-driven plan.
#[derive(Parser, Debug)]
#[command(
    name = "dbprov",
    version,
    about = "Bootstrap service databases by running each service's population routine",
    after_help = "Examples:\n  dbprov\n  dbprov --config provision.json\n  dbprov --json\n  DBPROV_LOG=info dbprov --verbose"
)]
pub struct RootArgs {
    /// Path to a JSON provisioning config (defaults to the built-in plan)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit the machine-readable run report to stdout instead of status lines
    #[arg(long)]
    pub json: bool,

    /// Emit a per-step transcript on stderr
    #[arg(long)]
    pub verbose: bool,
}
