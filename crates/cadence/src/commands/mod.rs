mod add;
mod prepare;
mod publish;
mod status;

use std::path::Path;

use clap::Subcommand;

use crate::context::{Context, RemoteArgs};
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write a new changeset
    Add(add::AddArgs),
    /// Apply pending changesets and open or update the release pull request
    Prepare(prepare::PrepareArgs),
    /// Publish packages whose version is not on the registry yet
    Publish,
    /// Show pending changesets and the versions they would produce
    Status(status::StatusArgs),
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path, remote: RemoteArgs) -> Result<()> {
        let context = Context::load(start_path, remote)?;
        match self {
            Self::Add(args) => add::run(&context, args),
            Self::Prepare(args) => prepare::run(&context, &args),
            Self::Publish => publish::run(&context),
            Self::Status(args) => status::run(&context, &args),
        }
    }
}
