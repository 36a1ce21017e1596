use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::Result;
use crate::error::OperationError;
use crate::traits::CommandRunner;

/// Runs command lines through `sh -c`, inheriting stdio so tool output
/// shows up in the CI log.
#[derive(Debug, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str, cwd: &Path, env: &[(String, String)]) -> Result<()> {
        info!(%command, cwd = %cwd.display(), "running command");

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .envs(env.iter().map(|(key, value)| (key, value)))
            .status()
            .map_err(|source| OperationError::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(OperationError::CommandFailed {
                command: command.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
