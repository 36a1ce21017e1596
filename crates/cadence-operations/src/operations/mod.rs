mod add;
pub mod classify;
mod journal;
pub mod plan;
mod prepare;
mod publish;
mod status;

pub use add::{AddInput, AddOperation};
pub use classify::{Classification, attribute, classify};
pub use journal::WriteJournal;
pub use plan::{ReleasePlan, ReleaseTarget, ResolutionMode, plan_release, release_target};
pub use prepare::{PrepareInput, PrepareOperation, PrepareOutcome};
pub use publish::{PublishOperation, PublishOutcome, PublishedPackage, SkipReason, SkippedPackage};
pub use status::{StatusOperation, StatusOutput};
