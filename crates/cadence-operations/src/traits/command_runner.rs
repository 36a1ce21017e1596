use std::path::Path;

use crate::Result;

pub trait CommandRunner: Send + Sync {
    /// Runs a shell command line in `cwd` with extra environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits non-zero.
    fn run(&self, command: &str, cwd: &Path, env: &[(String, String)]) -> Result<()>;
}
