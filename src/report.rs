//! Machine-readable report for one provisioning run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Outcome of one provisioning step.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StepOutcome {
    /// The artifact exists after the population command returned.
    Provisioned,
    /// The command returned but the artifact is not on disk.
    ArtifactMissing,
    /// The command could not be started.
    ExecutionError { cause: String },
}

#[derive(Serialize, Debug, Clone)]
pub struct StepReport {
    pub service: String,
    pub argv: Vec<String>,
    pub artifact: String,
    pub outcome: StepOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_snippet: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct RunReport {
    pub schema_version: u32,
    pub generated_at_epoch_ms: u128,
    pub steps: Vec<StepReport>,
    pub provisioned_count: usize,
    pub artifact_missing_count: usize,
    pub execution_error_count: usize,
}

impl RunReport {
    pub fn new(steps: Vec<StepReport>) -> Result<Self> {
        let provisioned_count = steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Provisioned)
            .count();
        let artifact_missing_count = steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::ArtifactMissing)
            .count();
        let execution_error_count = steps.len() - provisioned_count - artifact_missing_count;
        Ok(Self {
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at_epoch_ms: now_epoch_ms()?,
            steps,
            provisioned_count,
            artifact_missing_count,
            execution_error_count,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize run report")
    }
}

pub fn now_epoch_ms() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("compute timestamp")?
        .as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(service: &str, outcome: StepOutcome) -> StepReport {
        StepReport {
            service: service.to_string(),
            argv: vec!["true".to_string()],
            artifact: format!("var/{service}.db"),
            outcome,
            exit_code: Some(0),
            stdout_bytes: 0,
            stderr_bytes: 0,
            stdout_snippet: None,
            stderr_snippet: None,
        }
    }

    #[test]
    fn counts_outcomes_by_kind() {
        let report = RunReport::new(vec![
            step("enrollment", StepOutcome::Provisioned),
            step("users", StepOutcome::ArtifactMissing),
            step(
                "grades",
                StepOutcome::ExecutionError {
                    cause: "command not found".to_string(),
                },
            ),
        ])
        .expect("build report");
        assert_eq!(report.provisioned_count, 1);
        assert_eq!(report.artifact_missing_count, 1);
        assert_eq!(report.execution_error_count, 1);
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let json = serde_json::to_value(StepOutcome::ExecutionError {
            cause: "boom".to_string(),
        })
        .expect("serialize outcome");
        assert_eq!(json["kind"], "execution_error");
        assert_eq!(json["cause"], "boom");
    }
}
