//! External command execution: run a population routine synchronously and
//! capture exit code and output.
//!
//! The orchestrator is generic over [`CommandRunner`] so tests can intercept
//! invocations and assert call order without touching the filesystem.

use std::path::Path;
use std::process::Command;

pub(crate) const MAX_SNIPPET_LEN: usize = 512;

/// Captured result of one population-command invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub argv: Vec<String>,
    /// None when the child was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Set when the command could not be started at all.
    pub spawn_error: Option<String>,
}

impl Invocation {
    pub fn spawn_failed(argv: Vec<String>, error: String) -> Self {
        Self {
            argv,
            exit_code: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
            spawn_error: Some(error),
        }
    }
}

/// Seam for executing population commands.
pub trait CommandRunner {
    /// Run `argv` synchronously, inheriting the caller's working directory
    /// and environment, and wait for it to exit.
    fn run(&mut self, argv: &[String]) -> Invocation;
}

/// Runner backed by real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, argv: &[String]) -> Invocation {
        let Some(program) = argv.first() else {
            return Invocation::spawn_failed(argv.to_vec(), "empty argv".to_string());
        };

        // Resolve the program up front so a missing binary surfaces as a
        // distinct execution error rather than a bare OS spawn failure.
        let program = if Path::new(program).components().count() > 1 {
            Path::new(program).to_path_buf()
        } else {
            match which::which(program) {
                Ok(resolved) => resolved,
                Err(err) => {
                    return Invocation::spawn_failed(
                        argv.to_vec(),
                        format!("command '{program}' not found: {err}"),
                    )
                }
            }
        };

        let output = Command::new(&program).args(&argv[1..]).output();
        match output {
            Ok(output) => Invocation {
                argv: argv.to_vec(),
                exit_code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
                spawn_error: None,
            },
            Err(err) => Invocation::spawn_failed(argv.to_vec(), err.to_string()),
        }
    }
}

/// Byte count plus a bounded lossy-UTF-8 snippet, for reports and logs.
pub(crate) fn summarize_output(bytes: &[u8]) -> (u64, Option<String>) {
    if bytes.is_empty() {
        return (0, None);
    }
    let max = MAX_SNIPPET_LEN.min(bytes.len());
    let snippet = String::from_utf8_lossy(&bytes[..max]).to_string();
    (bytes.len() as u64, Some(snippet))
}
