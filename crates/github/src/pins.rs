//! [`PinBoard`] over the GraphQL API.
//!
//! Every document takes its inputs as bound variables; values are never
//! spliced into query text.

use async_trait::async_trait;
use lifecycle::{IssueNodeId, PinBoard, TrackerError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GithubClient;

const PINNED_ISSUES_QUERY: &str = "query($owner: String!, $name: String!) { \
     repository(owner: $owner, name: $name) { \
     pinnedIssues(last: 3) { nodes { issue { id } } } } }";

const PIN_ISSUE_MUTATION: &str = "mutation($issueId: ID!) { \
     pinIssue(input: { issueId: $issueId }) { issue { id } } }";

const UNPIN_ISSUE_MUTATION: &str = "mutation($issueId: ID!) { \
     unpinIssue(input: { issueId: $issueId }) { issue { id } } }";

#[derive(Debug, Serialize)]
struct RepositoryVariables<'a> {
    owner: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueVariables<'a> {
    issue_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedIssuesData {
    repository: Option<PinnedRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedRepository {
    pinned_issues: PinnedConnection,
}

#[derive(Debug, Deserialize)]
struct PinnedConnection {
    #[serde(default)]
    nodes: Vec<Option<PinnedNode>>,
}

#[derive(Debug, Deserialize)]
struct PinnedNode {
    issue: IssueRef,
}

#[derive(Debug, Deserialize)]
struct IssueRef {
    id: IssueNodeId,
}

#[async_trait]
impl PinBoard for GithubClient {
    async fn pinned_issues(&self) -> Result<Vec<IssueNodeId>, TrackerError> {
        let repository = self.repository();
        let data: PinnedIssuesData = self
            .graphql(
                "list pinned issues",
                PINNED_ISSUES_QUERY,
                RepositoryVariables {
                    owner: repository.owner(),
                    name: repository.name(),
                },
            )
            .await?;

        Ok(data
            .repository
            .map(|repo| {
                repo.pinned_issues
                    .nodes
                    .into_iter()
                    .flatten()
                    .map(|node| node.issue.id)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn pin_issue(&self, issue: &IssueNodeId) -> Result<(), TrackerError> {
        self.graphql::<_, Value>(
            "pin issue",
            PIN_ISSUE_MUTATION,
            IssueVariables {
                issue_id: issue.as_str(),
            },
        )
        .await?;
        Ok(())
    }

    async fn unpin_issue(&self, issue: &IssueNodeId) -> Result<(), TrackerError> {
        self.graphql::<_, Value>(
            "unpin issue",
            UNPIN_ISSUE_MUTATION,
            IssueVariables {
                issue_id: issue.as_str(),
            },
        )
        .await?;
        Ok(())
    }
}
