//! In-memory tracker double that records every call in order.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lifecycle::{
    ColumnId, ColumnSummary, CreatedIssue, IssueDatabaseId, IssueNodeId, IssueNumber,
    IssueTracker, MilestoneNumber, NewIssue, Page, PinBoard, PreviousIssueRef, ProjectBoard,
    ProjectId, ProjectNumber, ProjectScope, ProjectSummary, TrackerError,
};

/// Number given to the issue the fake creates.
pub(crate) const NEW_ISSUE_NUMBER: u64 = 42;
pub(crate) const NEW_ISSUE_DATABASE_ID: u64 = 4200;
pub(crate) const NEW_ISSUE_NODE_ID: &str = "I_new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    LatestOpenIssue(Vec<String>),
    CreateIssue(NewIssue),
    CloseIssue(u64),
    Comment(u64, String),
    SetMilestone(u64, u64),
    PinnedIssues,
    Pin(String),
    Unpin(String),
    ListProjects(ProjectScope, u32),
    ListColumns(u64, u32),
    CreateCard(u64, u64),
}

#[derive(Default)]
pub(crate) struct FakeTracker {
    calls: Mutex<Vec<Call>>,
    previous: Option<PreviousIssueRef>,
    pinned: Vec<IssueNodeId>,
    project_pages: Vec<Vec<ProjectSummary>>,
    column_pages: HashMap<u64, Vec<Vec<ColumnSummary>>>,
    failing: Vec<&'static str>,
}

impl FakeTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_previous(mut self, number: u64, node_id: &str, assignees: &[&str]) -> Self {
        self.previous = Some(PreviousIssueRef {
            number: IssueNumber::new(number),
            node_id: node_id_of(node_id),
            assignees: assignees.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    pub(crate) fn with_pinned(mut self, node_ids: &[&str]) -> Self {
        self.pinned = node_ids.iter().map(|id| node_id_of(id)).collect();
        self
    }

    /// Each inner vector is one page; projects are `(id, number, name)`.
    pub(crate) fn with_project_pages(mut self, pages: &[&[(u64, u64, &str)]]) -> Self {
        self.project_pages = pages
            .iter()
            .map(|page| {
                page.iter()
                    .map(|(id, number, name)| ProjectSummary {
                        id: ProjectId::new(*id),
                        number: ProjectNumber::new(*number),
                        name: name.to_string(),
                    })
                    .collect()
            })
            .collect();
        self
    }

    /// Each inner vector is one page; columns are `(id, name)`.
    pub(crate) fn with_column_pages(mut self, project_id: u64, pages: &[&[(u64, &str)]]) -> Self {
        let pages = pages
            .iter()
            .map(|page| {
                page.iter()
                    .map(|(id, name)| ColumnSummary {
                        id: ColumnId::new(*id),
                        name: name.to_string(),
                    })
                    .collect()
            })
            .collect();
        self.column_pages.insert(project_id, pages);
        self
    }

    /// Makes the named operation fail with a server error.
    pub(crate) fn failing(mut self, operation: &'static str) -> Self {
        self.failing.push(operation);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Calls that change tracker state.
    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                !matches!(
                    call,
                    Call::LatestOpenIssue(_)
                        | Call::PinnedIssues
                        | Call::ListProjects(..)
                        | Call::ListColumns(..)
                )
            })
            .collect()
    }

    fn record(&self, call: Call, operation: &'static str) -> Result<(), TrackerError> {
        self.calls.lock().expect("calls lock").push(call);
        if self.failing.contains(&operation) {
            return Err(TrackerError::Status {
                operation,
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) fn node_id_of(value: &str) -> IssueNodeId {
    IssueNodeId::new(value).expect("non-empty node id")
}

fn page_of<T: Clone>(pages: &[Vec<T>], page: u32) -> Page<T> {
    let index = page.saturating_sub(1) as usize;
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_page = (index + 1 < pages.len()).then_some(page + 1);
    Page { items, next_page }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn latest_open_issue(
        &self,
        labels: &[String],
    ) -> Result<Option<PreviousIssueRef>, TrackerError> {
        self.record(Call::LatestOpenIssue(labels.to_vec()), "list issues")?;
        Ok(self.previous.clone())
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, TrackerError> {
        self.record(Call::CreateIssue(issue.clone()), "create issue")?;
        Ok(CreatedIssue {
            number: IssueNumber::new(NEW_ISSUE_NUMBER),
            database_id: IssueDatabaseId::new(NEW_ISSUE_DATABASE_ID),
            node_id: node_id_of(NEW_ISSUE_NODE_ID),
        })
    }

    async fn close_issue(&self, number: IssueNumber) -> Result<(), TrackerError> {
        self.record(Call::CloseIssue(number.as_u64()), "close issue")
    }

    async fn create_comment(&self, number: IssueNumber, body: &str) -> Result<(), TrackerError> {
        self.record(
            Call::Comment(number.as_u64(), body.to_string()),
            "create comment",
        )
    }

    async fn set_milestone(
        &self,
        number: IssueNumber,
        milestone: MilestoneNumber,
    ) -> Result<(), TrackerError> {
        self.record(
            Call::SetMilestone(number.as_u64(), milestone.as_u64()),
            "set milestone",
        )
    }
}

#[async_trait]
impl PinBoard for FakeTracker {
    async fn pinned_issues(&self) -> Result<Vec<IssueNodeId>, TrackerError> {
        self.record(Call::PinnedIssues, "list pinned issues")?;
        Ok(self.pinned.clone())
    }

    async fn pin_issue(&self, issue: &IssueNodeId) -> Result<(), TrackerError> {
        self.record(Call::Pin(issue.to_string()), "pin issue")
    }

    async fn unpin_issue(&self, issue: &IssueNodeId) -> Result<(), TrackerError> {
        self.record(Call::Unpin(issue.to_string()), "unpin issue")
    }
}

#[async_trait]
impl ProjectBoard for FakeTracker {
    async fn list_projects(
        &self,
        scope: ProjectScope,
        page: u32,
    ) -> Result<Page<ProjectSummary>, TrackerError> {
        self.record(Call::ListProjects(scope, page), "list projects")?;
        Ok(page_of(&self.project_pages, page))
    }

    async fn list_columns(
        &self,
        project: ProjectId,
        page: u32,
    ) -> Result<Page<ColumnSummary>, TrackerError> {
        self.record(Call::ListColumns(project.as_u64(), page), "list columns")?;
        let pages = self
            .column_pages
            .get(&project.as_u64())
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(page_of(pages, page))
    }

    async fn create_card(
        &self,
        column: ColumnId,
        issue: IssueDatabaseId,
    ) -> Result<(), TrackerError> {
        self.record(
            Call::CreateCard(column.as_u64(), issue.as_u64()),
            "create project card",
        )
    }
}
