//! Service provisioning plan model and validation rules.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum length of a service name accepted by the planner.
pub(crate) const MAX_NAME_LEN: usize = 64;
/// Maximum length of a population command string accepted by the planner.
pub(crate) const MAX_COMMAND_LEN: usize = 4096;

/// One registered service: its population command and the database artifact
/// that command is expected to leave on disk.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    pub name: String,
    /// Population command in shell-words syntax; split into argv before
    /// execution, never handed to a shell.
    pub command: String,
    pub artifact: PathBuf,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, command: impl Into<String>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            artifact: artifact.into(),
        }
    }

    /// Status line emitted when the artifact exists after the population step.
    pub fn success_message(&self) -> String {
        format!("{} service database has been created.", capitalize(&self.name))
    }
}

/// Ordered provisioning plan. Entries run in registration order; the run
/// never reorders or parallelizes them.
#[derive(Debug, Clone, Default)]
pub struct ProvisionPlan {
    entries: Vec<ServiceEntry>,
}

impl ProvisionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in plan matching the original bootstrap: enrollment first,
    /// then users, each owning a disjoint storage root.
    pub fn builtin() -> Self {
        Self::new()
            .register(ServiceEntry::new(
                "enrollment",
                "python3 enrollment/create_db.py",
                "var/enrollment/enrollment.db",
            ))
            .register(ServiceEntry::new(
                "users",
                "python3 users/create_db.py",
                "var/users/users.db",
            ))
    }

    pub fn register(mut self, entry: ServiceEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    /// Validate all entries, returning every problem found rather than the
    /// first one.
    pub fn validate(&self) -> Option<Vec<String>> {
        let mut errors = Vec::new();
        if self.entries.is_empty() {
            errors.push("plan has no registered services".to_string());
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            validate_entry(idx, entry, &mut errors);
            if self.entries[..idx].iter().any(|prior| prior.name == entry.name) {
                errors.push(format!("services[{idx}] duplicates name '{}'", entry.name));
            }
        }
        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}

fn validate_entry(idx: usize, entry: &ServiceEntry, errors: &mut Vec<String>) {
    if entry.name.trim().is_empty() {
        errors.push(format!("services[{idx}] name is empty"));
    }
    if entry.name.len() > MAX_NAME_LEN {
        errors.push(format!("services[{idx}] name exceeds max length ({MAX_NAME_LEN})"));
    }
    if entry.command.trim().is_empty() {
        errors.push(format!("services[{idx}] command is empty"));
    } else if entry.command.len() > MAX_COMMAND_LEN {
        errors.push(format!(
            "services[{idx}] command exceeds max length ({MAX_COMMAND_LEN})"
        ));
    } else {
        match shell_words::split(&entry.command) {
            Ok(argv) if argv.is_empty() => {
                errors.push(format!("services[{idx}] command has no program"));
            }
            Ok(_) => {}
            Err(err) => errors.push(format!("services[{idx}] command does not parse: {err}")),
        }
    }
    if entry.artifact.as_os_str().is_empty() {
        errors.push(format!("services[{idx}] artifact path is empty"));
    }
    if entry.artifact == Path::new("/") {
        errors.push(format!("services[{idx}] artifact path is the filesystem root"));
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
