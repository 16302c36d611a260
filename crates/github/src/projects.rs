//! [`ProjectBoard`] over the classic projects REST API.

use async_trait::async_trait;
use lifecycle::{
    ColumnId, ColumnSummary, IssueDatabaseId, Page, ProjectBoard, ProjectId, ProjectScope,
    ProjectSummary, TrackerError,
};
use serde::Serialize;
use serde_json::Value;

use crate::client::GithubClient;
use crate::models::{RestColumn, RestProject};

/// Card payload referencing an existing issue.
#[derive(Debug, Serialize)]
struct NewCard {
    content_id: IssueDatabaseId,
    content_type: &'static str,
}

impl GithubClient {
    /// Listing endpoint for `scope`. User and organization boards belong to
    /// the repository owner.
    fn projects_url(&self, scope: ProjectScope) -> String {
        let owner = self.repository().owner();
        match scope {
            ProjectScope::Repository => self.repo_url("projects"),
            ProjectScope::User => self.url(&format!("users/{owner}/projects")),
            ProjectScope::Organization => self.url(&format!("orgs/{owner}/projects")),
        }
    }
}

#[async_trait]
impl ProjectBoard for GithubClient {
    async fn list_projects(
        &self,
        scope: ProjectScope,
        page: u32,
    ) -> Result<Page<ProjectSummary>, TrackerError> {
        let request = self.http().get(self.projects_url(scope));
        let page = self
            .send_page::<RestProject>("list projects", request, page)
            .await?;
        Ok(Page {
            items: page.items.into_iter().map(ProjectSummary::from).collect(),
            next_page: page.next_page,
        })
    }

    async fn list_columns(
        &self,
        project: ProjectId,
        page: u32,
    ) -> Result<Page<ColumnSummary>, TrackerError> {
        let request = self
            .http()
            .get(self.url(&format!("projects/{project}/columns")));
        let page = self
            .send_page::<RestColumn>("list columns", request, page)
            .await?;
        Ok(Page {
            items: page.items.into_iter().map(ColumnSummary::from).collect(),
            next_page: page.next_page,
        })
    }

    async fn create_card(
        &self,
        column: ColumnId,
        issue: IssueDatabaseId,
    ) -> Result<(), TrackerError> {
        let request = self
            .http()
            .post(self.url(&format!("projects/columns/{column}/cards")))
            .json(&NewCard {
                content_id: issue,
                content_type: "Issue",
            });
        self.send_json::<Value>("create project card", request)
            .await?;
        Ok(())
    }
}
