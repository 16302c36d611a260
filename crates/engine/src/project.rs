//! Project board column resolution and card creation.
//!
//! Listings are paginated and always read to the last page before a lookup
//! is declared a miss.

use lifecycle::{
    ColumnSummary, IssueDatabaseId, LifecycleError, NotFoundError, Page, ProjectBoard,
    ProjectColumn, ProjectScope, ProjectSummary, ProjectTarget,
};
use tracing::{debug, info};

/// Maps `(scope, project number, column name)` to a concrete column.
pub struct ProjectColumnResolver<'a, B: ProjectBoard + ?Sized> {
    board: &'a B,
}

impl<'a, B: ProjectBoard + ?Sized> ProjectColumnResolver<'a, B> {
    pub fn new(board: &'a B) -> Self {
        Self { board }
    }

    /// Resolves `target` to a project and column id.
    ///
    /// Column names match exactly, including case.
    pub async fn resolve(&self, target: &ProjectTarget) -> Result<ProjectColumn, LifecycleError> {
        let project = self
            .find_project(target.scope, |p| p.number == target.number)
            .await?
            .ok_or(NotFoundError::Project {
                scope: target.scope,
                number: target.number,
            })?;
        debug!(
            number = %target.number,
            id = %project.id,
            name = %project.name,
            "resolved project"
        );

        let column = self
            .find_column(&project, |c| c.name == target.column)
            .await?
            .ok_or_else(|| NotFoundError::Column {
                project: target.number,
                column: target.column.clone(),
            })?;
        debug!(column = %target.column, id = %column.id, "resolved column");

        Ok(ProjectColumn {
            project: project.id,
            column: column.id,
        })
    }

    /// Resolves `target` and adds `issue` to that column as a new card.
    pub async fn attach(
        &self,
        target: &ProjectTarget,
        issue: IssueDatabaseId,
    ) -> Result<ProjectColumn, LifecycleError> {
        let resolved = self.resolve(target).await?;
        self.board.create_card(resolved.column, issue).await?;
        info!(
            project = %target.number,
            column = %target.column,
            "added issue to project column"
        );
        Ok(resolved)
    }

    async fn find_project(
        &self,
        scope: ProjectScope,
        matches: impl Fn(&ProjectSummary) -> bool,
    ) -> Result<Option<ProjectSummary>, LifecycleError> {
        let mut page = 1;
        loop {
            let Page { items, next_page } = self.board.list_projects(scope, page).await?;
            if let Some(found) = items.into_iter().find(|p| matches(p)) {
                return Ok(Some(found));
            }
            match next_page {
                Some(next) => page = next,
                None => return Ok(None),
            }
        }
    }

    async fn find_column(
        &self,
        project: &ProjectSummary,
        matches: impl Fn(&ColumnSummary) -> bool,
    ) -> Result<Option<ColumnSummary>, LifecycleError> {
        let mut page = 1;
        loop {
            let Page { items, next_page } = self.board.list_columns(project.id, page).await?;
            if let Some(found) = items.into_iter().find(|c| matches(c)) {
                return Ok(Some(found));
            }
            match next_page {
                Some(next) => page = next,
                None => return Ok(None),
            }
        }
    }
}
