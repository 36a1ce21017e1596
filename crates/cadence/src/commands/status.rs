use cadence_operations::operations::{StatusOperation, StatusOutput};
use clap::Args;

use crate::context::Context;
use crate::error::Result;

#[derive(Args)]
pub(crate) struct StatusArgs {
    /// Branch to plan for in the branch flow (default: current branch)
    #[arg(long)]
    branch: Option<String>,
}

pub(crate) fn run(context: &Context, args: &StatusArgs) -> Result<()> {
    let operation = StatusOperation::new(context.changesets(), context.manifests()?, context.vcs());
    let output = operation.execute(&context.project, args.branch.as_deref())?;

    print!("{}", format_status(&output));
    Ok(())
}

fn format_status(output: &StatusOutput) -> String {
    if output.pending.is_empty() {
        return "No pending changesets.\n".to_string();
    }

    let mut text = format!("Pending changesets: {}\n", output.pending.len());
    for changeset in &output.pending {
        text.push_str(&format!("  {}\n", changeset.id));
    }

    let Some(plan) = &output.plan else {
        text.push_str("\nThis branch does not release.\n");
        return text;
    };

    if !plan.updates.is_empty() {
        text.push_str("\nProjected releases:\n");
        for update in &plan.updates {
            text.push_str(&format!(
                "  {}: {} -> {}\n",
                update.package.name, update.package.version, update.next_version
            ));
        }
    }

    if !plan.dropped.is_empty() {
        text.push_str("\nIgnored changesets:\n");
        for dropped in &plan.dropped {
            text.push_str(&format!("  {} ({})\n", dropped.id, dropped.reason));
        }
    }

    text
}
