use cadence_core::ChangeType;
use cadence_operations::operations::{AddInput, AddOperation};
use clap::Args;

use crate::context::Context;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct AddArgs {
    /// Package the change belongs to
    #[arg(long, short)]
    package: String,

    /// Change type: patch, minor, major or next
    #[arg(long = "type", short = 't')]
    change_type: ChangeType,

    /// Pull request that introduced the change
    #[arg(long)]
    pr: Option<u64>,

    /// Changelog entry text
    #[arg(long, short)]
    message: String,
}

pub(crate) fn run(context: &Context, args: AddArgs) -> Result<()> {
    let operation = AddOperation::new(context.changesets(), context.manifests()?);

    let path = operation.execute(AddInput {
        package: args.package,
        change_type: args.change_type,
        pull_request: args.pr,
        description: args.message,
    })?;

    println!("Created changeset: {}", path.display());
    Ok(())
}
