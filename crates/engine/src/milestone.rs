//! Milestone assignment.

use lifecycle::{IssueNumber, IssueTracker, LifecycleError, MilestoneNumber};
use tracing::info;

/// Attaches an issue to a milestone with a single update call.
pub struct MilestoneAssigner<'a, T: IssueTracker + ?Sized> {
    tracker: &'a T,
}

impl<'a, T: IssueTracker + ?Sized> MilestoneAssigner<'a, T> {
    pub fn new(tracker: &'a T) -> Self {
        Self { tracker }
    }

    pub async fn assign(
        &self,
        issue: IssueNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), LifecycleError> {
        self.tracker.set_milestone(issue, milestone).await?;
        info!(%issue, %milestone, "set milestone");
        Ok(())
    }
}
