//! Shared test infrastructure for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A provisioning fixture: a temp root, a generated config, and the
/// artifact paths the scripted population commands create (or skip).
pub struct ProvisionFixture {
    root: TempDir,
    services: Vec<serde_json::Value>,
    artifacts: Vec<PathBuf>,
}

impl Default for ProvisionFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisionFixture {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create fixture root"),
            services: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    /// Register a service whose population command creates its artifact.
    pub fn add_succeeding(&mut self, name: &str) -> &mut Self {
        let artifact = self.root.path().join(format!("{name}.db"));
        self.add_service(
            name,
            &format!("sh -c 'touch {}'", artifact.display()),
            &artifact,
        )
    }

    /// Register a service whose population command exits nonzero and leaves
    /// no artifact behind.
    pub fn add_failing(&mut self, name: &str) -> &mut Self {
        let artifact = self.root.path().join(format!("{name}.db"));
        self.add_service(name, "sh -c 'exit 1'", &artifact)
    }

    pub fn add_service(&mut self, name: &str, command: &str, artifact: &std::path::Path) -> &mut Self {
        self.services.push(serde_json::json!({
            "name": name,
            "command": command,
            "artifact": artifact,
        }));
        self.artifacts.push(artifact.to_path_buf());
        self
    }

    pub fn artifact(&self, index: usize) -> &std::path::Path {
        &self.artifacts[index]
    }

    /// Write the config and run dbprov against it.
    pub fn run(&self, extra_args: &[&str]) -> Output {
        let config_path = self.root.path().join("provision.json");
        let config = serde_json::json!({
            "schema_version": 1,
            "services": self.services,
        });
        std::fs::write(
            &config_path,
            serde_json::to_vec_pretty(&config).expect("serialize config"),
        )
        .expect("write config");

        Command::new(env!("CARGO_BIN_EXE_dbprov"))
            .arg("--config")
            .arg(&config_path)
            .args(extra_args)
            .output()
            .expect("run dbprov")
    }
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| line.to_string())
        .collect()
}
