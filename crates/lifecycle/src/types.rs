//! Shared value types for the recurring-issue lifecycle.
//!
//! Everything here is transient: values are fetched fresh from the tracker on
//! every run and dropped when the run ends. The tracker is the system of record.

use serde::{Deserialize, Serialize};

use crate::{ColumnId, IssueDatabaseId, IssueNodeId, IssueNumber, ProjectId, ProjectNumber};

// ---------------------------------------------------------------------------
// Predecessor sentinel
// ---------------------------------------------------------------------------

/// Sentinel used for "no predecessor was found" in numeric contexts.
pub const NO_PREDECESSOR: i64 = -1;

/// Returns `true` if `previous_issue_number` refers to a real issue.
///
/// `-1` ([`NO_PREDECESSOR`]) is reserved for absence; `0` counts as present.
pub fn issue_exists(previous_issue_number: i64) -> bool {
    previous_issue_number >= 0
}

// ---------------------------------------------------------------------------
// Project scope
// ---------------------------------------------------------------------------

/// Where a project board lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectScope {
    /// Projects attached to the repository itself.
    #[default]
    Repository,
    /// Projects owned by the repository owner's user account.
    User,
    /// Projects owned by the repository owner's organization.
    Organization,
}

impl ProjectScope {
    /// Returns the input spelling of this scope.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::User => "user",
            Self::Organization => "organization",
        }
    }
}

impl std::fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repository" => Ok(Self::Repository),
            "user" => Ok(Self::User),
            "organization" => Ok(Self::Organization),
            other => Err(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// Open/closed state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

/// The most recent open issue from a prior run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousIssueRef {
    /// Human-facing number, used for comments and closing.
    pub number: IssueNumber,
    /// GraphQL node id, used for unpinning.
    pub node_id: IssueNodeId,
    /// Assignee logins in the order the tracker reports them.
    pub assignees: Vec<String>,
}

impl PreviousIssueRef {
    /// The assignee that drives rotation: the first one, if any.
    pub fn first_assignee(&self) -> Option<&str> {
        self.assignees.first().map(String::as_str)
    }
}

/// Request to create a new issue.
///
/// Empty collections and an empty body are omitted from the serialized request
/// rather than sent as empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
}

/// Identifiers of an issue the tracker just created.
///
/// From the moment this value exists, the issue is real and is never rolled
/// back by this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub number: IssueNumber,
    pub database_id: IssueDatabaseId,
    pub node_id: IssueNodeId,
}

// ---------------------------------------------------------------------------
// Project boards
// ---------------------------------------------------------------------------

/// One entry from a project listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub number: ProjectNumber,
    pub name: String,
}

/// One entry from a column listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub id: ColumnId,
    pub name: String,
}

/// A resolved project-board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectColumn {
    pub project: ProjectId,
    pub column: ColumnId,
}

/// One page of a paginated listing.
///
/// `next_page` is `None` on the last page; callers keep requesting until then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// A page with no successor.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }
}
