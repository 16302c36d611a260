//! Linking comments between consecutive issues.

use lifecycle::{IssueNumber, IssueTracker, LifecycleError};
use tracing::debug;

/// Posts the forward and backward links between a new issue and its
/// predecessor.
pub struct CommentLinker<'a, T: IssueTracker + ?Sized> {
    tracker: &'a T,
}

impl<'a, T: IssueTracker + ?Sized> CommentLinker<'a, T> {
    pub fn new(tracker: &'a T) -> Self {
        Self { tracker }
    }

    /// Comments on `new` first, then on `previous`.
    pub async fn link(&self, new: IssueNumber, previous: IssueNumber) -> Result<(), LifecycleError> {
        debug!(%new, %previous, "posting linking comments");
        self.tracker
            .create_comment(new, &format!("Previous in series: #{previous}"))
            .await?;
        self.tracker
            .create_comment(previous, &format!("Next in series: #{new}"))
            .await?;
        Ok(())
    }
}
