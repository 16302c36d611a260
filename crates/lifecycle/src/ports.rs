//! Port traits: what the lifecycle needs from an issue tracker.
//!
//! Infrastructure crates implement these; the `engine` crate consumes them.
//! A single tracker handle is constructed per run and passed by reference into
//! every component, so tests can substitute an in-memory double.
//!
//! All traits use `async_trait` so they stay dyn-compatible.

use async_trait::async_trait;

use crate::{
    ColumnId, ColumnSummary, CreatedIssue, IssueDatabaseId, IssueNodeId, IssueNumber,
    MilestoneNumber, NewIssue, Page, PreviousIssueRef, ProjectId, ProjectScope, ProjectSummary,
    TrackerError,
};

/// Issue CRUD and comments.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Returns the most recently created open issue carrying all of `labels`,
    /// or `None` if there is none.
    async fn latest_open_issue(
        &self,
        labels: &[String],
    ) -> Result<Option<PreviousIssueRef>, TrackerError>;

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError>;

    async fn close_issue(&self, number: IssueNumber) -> Result<(), TrackerError>;

    async fn create_comment(&self, number: IssueNumber, body: &str) -> Result<(), TrackerError>;

    async fn set_milestone(
        &self,
        number: IssueNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), TrackerError>;
}

/// The repository's pinned-issue set.
///
/// The platform caps the set at three issues and enforces that cap itself.
#[async_trait]
pub trait PinBoard: Send + Sync {
    /// Node ids of the most recently pinned issues (at most three).
    async fn pinned_issues(&self) -> Result<Vec<IssueNodeId>, TrackerError>;

    async fn pin_issue(&self, issue: &IssueNodeId) -> Result<(), TrackerError>;

    async fn unpin_issue(&self, issue: &IssueNodeId) -> Result<(), TrackerError>;
}

/// Classic project boards.
#[async_trait]
pub trait ProjectBoard: Send + Sync {
    /// One page of projects visible in `scope`. Pages start at 1.
    async fn list_projects(
        &self,
        scope: ProjectScope,
        page: u32,
    ) -> Result<Page<ProjectSummary>, TrackerError>;

    /// One page of columns of `project`. Pages start at 1.
    async fn list_columns(
        &self,
        project: ProjectId,
        page: u32,
    ) -> Result<Page<ColumnSummary>, TrackerError>;

    /// Adds `issue` to `column` as a new card.
    async fn create_card(
        &self,
        column: ColumnId,
        issue: IssueDatabaseId,
    ) -> Result<(), TrackerError>;
}

/// Everything a full run needs, behind one handle.
pub trait Tracker: IssueTracker + PinBoard + ProjectBoard {}

impl<T: IssueTracker + PinBoard + ProjectBoard + ?Sized> Tracker for T {}
