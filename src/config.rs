//! JSON provisioning config: an ordered list of service entries.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::plan::{ProvisionPlan, ServiceEntry};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// On-disk provisioning config. Entry order in `services` is the run order.
#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ProvisionConfig {
    pub schema_version: u32,
    pub services: Vec<ServiceEntry>,
}

pub fn load_config(path: &Path) -> Result<ProvisionConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ProvisionConfig =
        serde_json::from_slice(&bytes).context("parse provisioning config JSON")?;
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {} (expected {})",
            config.schema_version,
            CONFIG_SCHEMA_VERSION
        ));
    }
    Ok(config)
}

/// Load and validate a plan from a config file.
pub fn load_plan(path: &Path) -> Result<ProvisionPlan> {
    let config = load_config(path)?;
    let plan = config
        .services
        .into_iter()
        .fold(ProvisionPlan::new(), ProvisionPlan::register);
    if let Some(errors) = plan.validate() {
        return Err(anyhow!(
            "invalid provisioning config {}: {}",
            path.display(),
            errors.join("; ")
        ));
    }
    Ok(plan)
}
