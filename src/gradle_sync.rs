//! Gradle integration for syncing a project after a wrapper upgrade
//!
//! This module provides:
//! - Detection of the project's Gradle wrapper script
//! - Execution of `gradlew help`, which downloads the new distribution

use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Task run to sync the project
const SYNC_TASK: &str = "help";

/// Result of a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl SyncResult {
    /// Create a successful sync result
    pub fn success(command: String, stdout: String, stderr: String) -> Self {
        Self {
            command,
            success: true,
            stdout,
            stderr,
        }
    }

    /// Create a failed sync result
    pub fn failure(command: String, stdout: String, stderr: String) -> Self {
        Self {
            command,
            success: false,
            stdout,
            stderr,
        }
    }
}

/// Trait for running Gradle in a project
pub trait GradleRunner {
    /// Sync the project in `project_dir`
    fn sync(&self, project_dir: &Path) -> SyncResult;
}

/// Runner that executes the wrapper script, or `gradle` when the project has none
#[derive(Debug, Default)]
pub struct SystemGradleRunner;

impl SystemGradleRunner {
    pub fn new() -> Self {
        Self
    }

    /// Program to run for `project_dir`
    fn program(&self, project_dir: &Path) -> String {
        let script = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
        let wrapper = project_dir.join(script);
        if wrapper.exists() {
            wrapper.to_string_lossy().into_owned()
        } else {
            "gradle".to_string()
        }
    }

    fn run_command(&self, program: &str, project_dir: &Path) -> std::io::Result<Output> {
        Command::new(program)
            .arg(SYNC_TASK)
            .current_dir(project_dir)
            .output()
    }
}

impl GradleRunner for SystemGradleRunner {
    fn sync(&self, project_dir: &Path) -> SyncResult {
        let program = self.program(project_dir);
        let command = format!("{} {}", program, SYNC_TASK);
        debug!(%command, "syncing Gradle project");

        match self.run_command(&program, project_dir) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();

                if output.status.success() {
                    SyncResult::success(command, stdout, stderr)
                } else {
                    SyncResult::failure(command, stdout, stderr)
                }
            }
            Err(e) => SyncResult::failure(
                command,
                String::new(),
                format!("Failed to execute command: {}", e),
            ),
        }
    }
}
