//! [`IssueTracker`] over the REST issues API.

use async_trait::async_trait;
use lifecycle::{
    CreatedIssue, IssueNumber, IssueState, IssueTracker, MilestoneNumber, NewIssue,
    PreviousIssueRef, TrackerError,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::GithubClient;
use crate::models::RestIssue;

#[derive(Debug, Serialize)]
struct StateUpdate {
    state: IssueState,
}

#[derive(Debug, Serialize)]
struct MilestoneUpdate {
    milestone: MilestoneNumber,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[async_trait]
impl IssueTracker for GithubClient {
    async fn latest_open_issue(
        &self,
        labels: &[String],
    ) -> Result<Option<PreviousIssueRef>, TrackerError> {
        let labels = labels.join(",");
        let request = self.http().get(self.repo_url("issues")).query(&[
            ("state", "open"),
            ("sort", "created"),
            ("direction", "desc"),
            ("labels", labels.as_str()),
        ]);
        // Newest first, so the first page is enough.
        let page = self
            .send_page::<RestIssue>("list issues", request, 1)
            .await?;

        let found = page
            .items
            .into_iter()
            .find(|issue| !issue.is_pull_request())
            .map(RestIssue::into_previous);
        debug!(
            previous = ?found.as_ref().map(|issue| issue.number),
            "searched for previous issue"
        );
        Ok(found)
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        let request = self.http().post(self.repo_url("issues")).json(issue);
        let created: RestIssue = self.send_json("create issue", request).await?;
        Ok(created.into_created())
    }

    async fn close_issue(&self, number: IssueNumber) -> Result<(), TrackerError> {
        let request = self
            .http()
            .patch(self.repo_url(&format!("issues/{number}")))
            .json(&StateUpdate {
                state: IssueState::Closed,
            });
        self.send_json::<Value>("close issue", request).await?;
        Ok(())
    }

    async fn create_comment(&self, number: IssueNumber, body: &str) -> Result<(), TrackerError> {
        let request = self
            .http()
            .post(self.repo_url(&format!("issues/{number}/comments")))
            .json(&CommentBody { body });
        self.send_json::<Value>("create comment", request).await?;
        Ok(())
    }

    async fn set_milestone(
        &self,
        number: IssueNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), TrackerError> {
        let request = self
            .http()
            .patch(self.repo_url(&format!("issues/{number}")))
            .json(&MilestoneUpdate { milestone });
        self.send_json::<Value>("set milestone", request).await?;
        Ok(())
    }
}
