//! Wire shapes of the GitHub responses the adapter reads.
//!
//! Only the fields the lifecycle needs are declared; serde ignores the rest.

use lifecycle::{
    ColumnId, ColumnSummary, CreatedIssue, IssueDatabaseId, IssueNodeId, IssueNumber,
    PreviousIssueRef, ProjectId, ProjectNumber, ProjectSummary,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RestUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestIssue {
    pub id: IssueDatabaseId,
    pub number: IssueNumber,
    pub node_id: IssueNodeId,
    #[serde(default)]
    pub assignees: Vec<RestUser>,
    /// Present only when the "issue" is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl RestIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn into_previous(self) -> PreviousIssueRef {
        PreviousIssueRef {
            number: self.number,
            node_id: self.node_id,
            assignees: self.assignees.into_iter().map(|user| user.login).collect(),
        }
    }

    pub fn into_created(self) -> CreatedIssue {
        CreatedIssue {
            number: self.number,
            database_id: self.id,
            node_id: self.node_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestProject {
    pub id: ProjectId,
    pub number: ProjectNumber,
    pub name: String,
}

impl From<RestProject> for ProjectSummary {
    fn from(project: RestProject) -> Self {
        Self {
            id: project.id,
            number: project.number,
            name: project.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestColumn {
    pub id: ColumnId,
    pub name: String,
}

impl From<RestColumn> for ColumnSummary {
    fn from(column: RestColumn) -> Self {
        Self {
            id: column.id,
            name: column.name,
        }
    }
}
