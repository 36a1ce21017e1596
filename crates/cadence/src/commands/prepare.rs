use cadence_operations::operations::{PrepareInput, PrepareOperation, PrepareOutcome};
use clap::Args;

use crate::context::Context;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct PrepareArgs {
    /// Branch to release from in the branch flow (default: current branch)
    #[arg(long)]
    branch: Option<String>,

    /// Plan the release without writing, committing or pushing
    #[arg(long)]
    dry_run: bool,
}

pub(crate) fn run(context: &Context, args: &PrepareArgs) -> Result<()> {
    let operation = PrepareOperation::new(
        context.changesets(),
        context.manifests()?,
        context.changelogs(),
        context.vcs(),
        context.forge()?,
        context.runner(),
    );
    let input = PrepareInput {
        branch: args.branch.clone(),
        dry_run: args.dry_run,
    };

    match operation.execute(&context.project, &input)? {
        PrepareOutcome::NoChangesets { deployed: true } => {
            println!("No pending changesets. Deploy command finished.");
        }
        PrepareOutcome::NoChangesets { deployed: false } => println!("No pending changesets."),
        PrepareOutcome::SkippedBranch => println!("This branch does not release. Nothing to do."),
        PrepareOutcome::NothingToRelease { dropped } => {
            println!("No package needs a release ({} changesets ignored).", dropped.len());
        }
        PrepareOutcome::DryRun(plan) => {
            println!("Dry run. Would release:");
            for update in &plan.updates {
                println!(
                    "  {}: {} -> {}",
                    update.package.name, update.package.version, update.next_version
                );
            }
        }
        PrepareOutcome::Prepared {
            plan,
            release_branch,
            pull_request,
            created,
        } => {
            for update in &plan.updates {
                println!("  {}@{}", update.package.name, update.next_version);
            }
            let verb = if created { "Opened" } else { "Updated" };
            println!(
                "{verb} release pull request #{} from {release_branch}: {}",
                pull_request.number, pull_request.url
            );
        }
    }

    Ok(())
}
