//! Sequential provisioning run over an ordered service plan.
//!
//! Each step runs the service's population command, then checks the expected
//! database artifact for existence. Steps never abort the run: a failed or
//! missing routine is recorded in the report and the next service still
//! runs. The run itself only fails on report assembly, not on step outcomes.

use anyhow::Result;

use crate::exec::{summarize_output, CommandRunner, Invocation};
use crate::plan::{ProvisionPlan, ServiceEntry};
use crate::report::{RunReport, StepOutcome, StepReport};

/// Run every entry in plan order and collect one step report per entry.
///
/// Entry i+1 never starts before entry i's command has returned control.
pub fn run(plan: &ProvisionPlan, runner: &mut impl CommandRunner) -> Result<RunReport> {
    let mut steps = Vec::with_capacity(plan.entries().len());
    for entry in plan.entries() {
        steps.push(provision_step(entry, runner));
    }
    RunReport::new(steps)
}

fn provision_step(entry: &ServiceEntry, runner: &mut impl CommandRunner) -> StepReport {
    let argv = match shell_words::split(&entry.command) {
        Ok(argv) if !argv.is_empty() => argv,
        Ok(_) => {
            return step_without_invocation(entry, "command has no program".to_string());
        }
        Err(err) => {
            return step_without_invocation(entry, format!("command does not parse: {err}"));
        }
    };

    tracing::info!(
        service = %entry.name,
        command = %entry.command,
        "running population routine"
    );
    let invocation = runner.run(&argv);

    // The population command's own exit status never gates the artifact
    // check; existence on disk is the post-condition that counts.
    let artifact_exists = entry.artifact.exists();
    let outcome = classify(&invocation, artifact_exists);

    match &outcome {
        StepOutcome::Provisioned => {
            if matches!(invocation.exit_code, Some(code) if code != 0) {
                tracing::warn!(
                    service = %entry.name,
                    exit_code = invocation.exit_code,
                    "artifact present but population routine exited nonzero"
                );
            } else {
                tracing::info!(service = %entry.name, artifact = %entry.artifact.display(), "provisioned");
            }
        }
        StepOutcome::ArtifactMissing => {
            tracing::warn!(
                service = %entry.name,
                artifact = %entry.artifact.display(),
                exit_code = invocation.exit_code,
                "artifact missing after population routine"
            );
        }
        StepOutcome::ExecutionError { cause } => {
            tracing::warn!(service = %entry.name, %cause, "population routine failed to run");
        }
    }

    let (stdout_bytes, stdout_snippet) = summarize_output(&invocation.stdout);
    let (stderr_bytes, stderr_snippet) = summarize_output(&invocation.stderr);
    StepReport {
        service: entry.name.clone(),
        argv: invocation.argv,
        artifact: entry.artifact.display().to_string(),
        outcome,
        exit_code: invocation.exit_code,
        stdout_bytes,
        stderr_bytes,
        stdout_snippet,
        stderr_snippet,
    }
}

/// An existing artifact always counts as provisioned, matching the original
/// bootstrap's existence-only check; spawn failures are only surfaced when
/// they left no artifact behind.
fn classify(invocation: &Invocation, artifact_exists: bool) -> StepOutcome {
    if artifact_exists {
        return StepOutcome::Provisioned;
    }
    if let Some(cause) = &invocation.spawn_error {
        return StepOutcome::ExecutionError {
            cause: cause.clone(),
        };
    }
    StepOutcome::ArtifactMissing
}

fn step_without_invocation(entry: &ServiceEntry, cause: String) -> StepReport {
    tracing::warn!(service = %entry.name, %cause, "population routine rejected");
    StepReport {
        service: entry.name.clone(),
        argv: Vec::new(),
        artifact: entry.artifact.display().to_string(),
        outcome: if entry.artifact.exists() {
            StepOutcome::Provisioned
        } else {
            StepOutcome::ExecutionError { cause }
        },
        exit_code: None,
        stdout_bytes: 0,
        stderr_bytes: 0,
        stdout_snippet: None,
        stderr_snippet: None,
    }
}
