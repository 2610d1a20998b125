//! Utilities for running the external commands of the scripts.

use std::process::{Command, Stdio};

use tracing::info;

use crate::errors::ScriptError;

/// Runs the external commands of a build or deployment, one at a time
pub trait CommandRunner {
    /// Run `cmd`, returning an error if it can't be spawned or doesn't succeed.
    /// `step` names the command in errors & logs.
    fn run(&mut self, step: &str, cmd: Command) -> Result<(), ScriptError>;

    /// Whether commands really execute, false for dry runs
    fn executes(&self) -> bool {
        true
    }
}

/// Runs commands on the host, output forwarded to the terminal
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, step: &str, cmd: Command) -> Result<(), ScriptError> {
        command_success_or(cmd, step)
    }
}

/// Only logs the commands it is handed
#[derive(Debug, Default)]
pub struct DryRunRunner {
    /// Rendered command lines, in order
    pub commands: Vec<String>,
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, step: &str, cmd: Command) -> Result<(), ScriptError> {
        let rendered = render_command(&cmd);
        info!("[dry-run] {}: {}", step, rendered);
        self.commands.push(rendered);
        Ok(())
    }

    fn executes(&self) -> bool {
        false
    }
}

/// Executes a command, returning an error if the command fails
pub fn command_success_or(mut cmd: Command, step: &str) -> Result<(), ScriptError> {
    info!("Running command: {}", render_command(&cmd));
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

    let status = cmd
        .status()
        .map_err(|e| ScriptError::CommandFailed(format!("{}: {}", step, e)))?;
    if !status.success() {
        Err(ScriptError::CommandFailed(format!("{}: {}", step, status)))
    } else {
        Ok(())
    }
}

/// Renders a command the way it would be typed in a shell
pub fn render_command(cmd: &Command) -> String {
    let mut parts = vec![shell_escape::unix::escape(cmd.get_program().to_string_lossy())];
    parts.extend(
        cmd.get_args()
            .map(|arg| shell_escape::unix::escape(arg.to_string_lossy())),
    );
    parts.join(" ")
}
