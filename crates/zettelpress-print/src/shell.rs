// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shell command runner used by the discovery fallback strategies and by
// spool dispatch.
//
// Commands run through the platform shell (`sh -c` / `cmd /C`) so the query
// strings may use pipes. The calling task suspends until the child exits;
// no timeout is imposed here, so a stuck external command blocks its
// request indefinitely. Caller-level timeouts belong to the HTTP layer.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use zettelpress_core::error::{Result, ZettelpressError};

/// Captured output of a completed shell command.
#[derive(Debug, Clone)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes a single command line and returns its output.
///
/// A trait seam so discovery and dispatch can be tested against canned
/// command output without spawning processes.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Run `command` to completion. Fails with
    /// [`ZettelpressError::Process`] on spawn failure or non-zero exit.
    async fn run(&self, command: &str) -> Result<ShellOutput>;
}

/// The real shell, via `tokio::process`.
pub struct SystemShell {
    /// Suppress console windows on Windows (CREATE_NO_WINDOW).
    hide_windows: bool,
}

impl SystemShell {
    pub fn new(hide_windows: bool) -> Self {
        Self { hide_windows }
    }

    fn base_command(&self, command_line: &str) -> Command {
        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command_line]);
            if self.hide_windows {
                cmd.creation_flags(CREATE_NO_WINDOW);
            }
            cmd
        }
        #[cfg(not(windows))]
        {
            // Window suppression is a Windows-only execution detail.
            let _ = self.hide_windows;
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command_line]);
            cmd
        }
    }
}

#[async_trait]
impl ShellRunner for SystemShell {
    async fn run(&self, command: &str) -> Result<ShellOutput> {
        debug!(command, "running shell command");

        let output = self
            .base_command(command)
            .output()
            .await
            .map_err(|e| ZettelpressError::Process {
                command: command.to_string(),
                detail: format!("spawn failed: {e}"),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ZettelpressError::Process {
                command: command.to_string(),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(ShellOutput { stdout, stderr })
    }
}
