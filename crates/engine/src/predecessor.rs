//! Locates the issue created by the previous run.

use lifecycle::{IssueTracker, LifecycleError, PreviousIssueRef};
use tracing::debug;

/// Finds the most recent open issue carrying every configured label.
pub struct PreviousIssueLocator<'a, T: IssueTracker + ?Sized> {
    tracker: &'a T,
}

impl<'a, T: IssueTracker + ?Sized> PreviousIssueLocator<'a, T> {
    pub fn new(tracker: &'a T) -> Self {
        Self { tracker }
    }

    /// Returns `Ok(None)` on a first run, when no matching issue exists.
    pub async fn locate(
        &self,
        labels: &[String],
    ) -> Result<Option<PreviousIssueRef>, LifecycleError> {
        debug!(?labels, "finding previous issue");
        let previous = self.tracker.latest_open_issue(labels).await?;
        match &previous {
            Some(issue) => debug!(number = %issue.number, "found previous issue"),
            None => debug!("no previous issue"),
        }
        Ok(previous)
    }
}
