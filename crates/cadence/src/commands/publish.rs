use cadence_operations::operations::{PublishOperation, PublishOutcome};

use crate::context::Context;
use crate::error::Result;

pub(crate) fn run(context: &Context) -> Result<()> {
    let operation = PublishOperation::new(
        context.changesets(),
        context.manifests()?,
        context.changelogs(),
        context.vcs(),
        context.forge()?,
        context.registry()?,
        context.runner(),
    )
    .with_env(context.publish_env());

    match operation.execute(&context.project)? {
        PublishOutcome::PendingChangesets { count } => {
            println!("{count} pending changesets. Merge the release pull request first.");
        }
        PublishOutcome::Published { packages, skipped } => {
            for package in &packages {
                println!("Published {} ({})", package.tag, package.channel);
            }
            for package in &skipped {
                println!("Skipped {}@{}: {}", package.name, package.version, package.reason);
            }
            if packages.is_empty() {
                println!("Nothing to publish.");
            }
        }
    }

    Ok(())
}
