//! Pinning and unpinning.
//!
//! The platform allows at most three pinned issues per repository and enforces
//! that cap itself; nothing here pre-checks capacity. Callers unpin the old
//! issue before pinning the new one so a full pin set has room.

use lifecycle::{IssueNodeId, LifecycleError, PinBoard};
use tracing::{debug, info};

/// Idempotent pin/unpin operations over a [`PinBoard`].
pub struct PinManager<'a, P: PinBoard + ?Sized> {
    board: &'a P,
}

/// What [`PinManager::unpin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpinOutcome {
    Unpinned,
    /// The issue was not in the pinned set; no mutation was sent.
    NotPinned,
}

impl<'a, P: PinBoard + ?Sized> PinManager<'a, P> {
    pub fn new(board: &'a P) -> Self {
        Self { board }
    }

    /// Returns `true` if `issue` is among the currently pinned issues.
    pub async fn is_pinned(&self, issue: &IssueNodeId) -> Result<bool, LifecycleError> {
        debug!(%issue, "checking pinned issues");
        let pinned = self.board.pinned_issues().await?;
        Ok(pinned.contains(issue))
    }

    /// Pins `issue`. Always sends the mutation.
    pub async fn pin(&self, issue: &IssueNodeId) -> Result<(), LifecycleError> {
        debug!(%issue, "pinning");
        self.board.pin_issue(issue).await?;
        info!(%issue, "pinned issue");
        Ok(())
    }

    /// Unpins `issue` if it is pinned; otherwise does nothing.
    pub async fn unpin(&self, issue: &IssueNodeId) -> Result<UnpinOutcome, LifecycleError> {
        if !self.is_pinned(issue).await? {
            debug!(%issue, "not pinned, skipping unpin");
            return Ok(UnpinOutcome::NotPinned);
        }
        debug!(%issue, "unpinning");
        self.board.unpin_issue(issue).await?;
        info!(%issue, "unpinned issue");
        Ok(UnpinOutcome::Unpinned)
    }
}
