//! The run state machine.
//!
//! ```text
//! Validating → LocatingPredecessor → Rendering → Creating
//!   → Attaching(project, milestone) → Linking → Closing&Pinning → Done
//! ```
//!
//! Any error moves the run to `Failed`. Nothing is compensated: once the new
//! issue exists, later failures are reported as
//! [`LifecycleError::PartialCompletion`] carrying its number.
//!
//! Every tracker call is awaited before the next one starts; later steps depend
//! on identifiers produced by earlier ones.

use lifecycle::{
    issue_exists, next_assignee, render_body, CreatedIssue, IssueNumber, LifecycleError,
    NewIssue, PreviousIssueRef, RawInputs, RunConfig, RunId, RunStep, TemplateContext, Tracker,
    NO_PREDECESSOR,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{
    CommentLinker, MilestoneAssigner, PinManager, PreviousIssueLocator, ProjectColumnResolver,
};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The issue created by this run. Its number is the run's output value.
    pub issue: CreatedIssue,
    /// The predecessor found at the start of the run, if any.
    pub previous: Option<PreviousIssueRef>,
    /// Assignees the new issue was created with.
    pub assignees: Vec<String>,
}

/// Sequences one run against a tracker.
pub struct Orchestrator<'a, T: Tracker + ?Sized> {
    tracker: &'a T,
}

impl<'a, T: Tracker + ?Sized> Orchestrator<'a, T> {
    pub fn new(tracker: &'a T) -> Self {
        Self { tracker }
    }

    /// Validates `inputs` and, if they are acceptable, executes the run.
    ///
    /// Invalid inputs fail before any tracker call is made.
    pub async fn run(&self, inputs: &RawInputs) -> Result<RunOutcome, LifecycleError> {
        let run_id = RunId::new_random();
        self.validate_and_execute(inputs)
            .instrument(info_span!("issue_run", %run_id))
            .await
    }

    async fn validate_and_execute(
        &self,
        inputs: &RawInputs,
    ) -> Result<RunOutcome, LifecycleError> {
        debug!(step = %RunStep::Validating, "entering step");
        let config = RunConfig::from_inputs(inputs)?;
        self.execute(&config).await
    }

    /// Executes a run for an already validated configuration.
    pub async fn execute(&self, config: &RunConfig) -> Result<RunOutcome, LifecycleError> {
        let previous = if config.features.needs_previous_issue() {
            debug!(step = %RunStep::LocatingPredecessor, "entering step");
            PreviousIssueLocator::new(self.tracker)
                .locate(&config.labels)
                .await?
        } else {
            None
        };
        let previous_number = previous
            .as_ref()
            .and_then(|p| i64::try_from(p.number.as_u64()).ok())
            .unwrap_or(NO_PREDECESSOR);
        let predecessor = previous.as_ref().filter(|_| issue_exists(previous_number));
        info!(previous_issue = previous_number, "predecessor resolved");

        let assignees = if config.features.rotate_assignees {
            next_assignee(
                &config.assignees,
                predecessor.and_then(PreviousIssueRef::first_assignee),
            )
        } else {
            config.assignees.clone()
        };

        debug!(step = %RunStep::Rendering, "entering step");
        let body = render_body(
            &config.body,
            &TemplateContext {
                previous_issue_number: predecessor.map(|p| p.number),
                assignees: &assignees,
            },
        );

        debug!(step = %RunStep::Creating, "entering step");
        let issue = self
            .tracker
            .create_issue(&NewIssue {
                title: config.title.clone(),
                body,
                labels: config.labels.clone(),
                assignees: assignees.clone(),
            })
            .await?;
        info!(number = %issue.number, node_id = %issue.node_id, "created issue");

        self.finish(config, &issue, predecessor).await?;

        info!(issue_number = %issue.number, "run complete");
        Ok(RunOutcome {
            issue,
            previous,
            assignees,
        })
    }

    /// Everything after creation: attach, link, close, re-pin.
    async fn finish(
        &self,
        config: &RunConfig,
        issue: &CreatedIssue,
        predecessor: Option<&PreviousIssueRef>,
    ) -> Result<(), LifecycleError> {
        let number = issue.number;
        let failed_at =
            move |step: RunStep| move |err: LifecycleError| err.after_creation(number, step);

        if let Some(target) = &config.project {
            debug!(step = %RunStep::AttachingProject, "entering step");
            ProjectColumnResolver::new(self.tracker)
                .attach(target, issue.database_id)
                .await
                .map_err(failed_at(RunStep::AttachingProject))?;
        }

        if let Some(milestone) = config.milestone {
            debug!(step = %RunStep::AttachingMilestone, "entering step");
            MilestoneAssigner::new(self.tracker)
                .assign(issue.number, milestone)
                .await
                .map_err(failed_at(RunStep::AttachingMilestone))?;
        }

        let Some(previous) = predecessor else {
            return Ok(());
        };

        if config.features.linked_comments {
            debug!(step = %RunStep::Linking, "entering step");
            CommentLinker::new(self.tracker)
                .link(issue.number, previous.number)
                .await
                .map_err(failed_at(RunStep::Linking))?;
        }

        if config.features.close_previous {
            debug!(step = %RunStep::ClosingPrevious, "entering step");
            self.close(previous.number)
                .await
                .map_err(failed_at(RunStep::ClosingPrevious))?;

            if config.features.pinned {
                self.repin(previous, issue).await?;
            }
        }

        Ok(())
    }

    async fn close(&self, number: IssueNumber) -> Result<(), LifecycleError> {
        self.tracker.close_issue(number).await?;
        info!(%number, "closed previous issue");
        Ok(())
    }

    /// Unpins the predecessor, then pins the new issue.
    ///
    /// The pin is attempted even when the unpin failed; the unpin failure is
    /// still what the run reports.
    async fn repin(
        &self,
        previous: &PreviousIssueRef,
        issue: &CreatedIssue,
    ) -> Result<(), LifecycleError> {
        let pins = PinManager::new(self.tracker);

        debug!(step = %RunStep::Unpinning, "entering step");
        let unpinned = pins.unpin(&previous.node_id).await;
        debug!(step = %RunStep::Pinning, "entering step");
        let pinned = pins.pin(&issue.node_id).await;

        match (unpinned, pinned) {
            (Ok(_), Ok(())) => Ok(()),
            (Err(err), pinned) => {
                if let Err(pin_err) = pinned {
                    warn!(error = %pin_err, "pinning the new issue failed as well");
                }
                Err(err.after_creation(issue.number, RunStep::Unpinning))
            }
            (Ok(_), Err(err)) => Err(err.after_creation(issue.number, RunStep::Pinning)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        Call, FakeTracker, NEW_ISSUE_DATABASE_ID, NEW_ISSUE_NODE_ID, NEW_ISSUE_NUMBER,
    };
    use lifecycle::{ConfigViolation, NotFoundError};

    fn inputs(title: &str) -> RawInputs {
        RawInputs {
            title: title.to_string(),
            ..RawInputs::default()
        }
    }

    fn created_issue(tracker: &FakeTracker) -> NewIssue {
        tracker
            .calls()
            .into_iter()
            .find_map(|call| match call {
                Call::CreateIssue(issue) => Some(issue),
                _ => None,
            })
            .expect("issue was created")
    }

    #[tokio::test]
    async fn invalid_inputs_make_no_tracker_calls() {
        let tracker = FakeTracker::new();
        let mut raw = inputs("");
        raw.pinned = true;

        let err = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect_err("invalid");

        match err {
            LifecycleError::Configuration(config) => {
                assert!(config.contains(&ConfigViolation::MissingTitle));
                assert!(config.contains(&ConfigViolation::LabelsRequired { feature: "pinned" }));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn title_only_run_skips_the_predecessor_lookup() {
        let tracker = FakeTracker::new();

        let outcome = Orchestrator::new(&tracker)
            .run(&inputs("Weekly sync"))
            .await
            .expect("run succeeds");

        assert_eq!(outcome.issue.number.as_u64(), NEW_ISSUE_NUMBER);
        assert_eq!(
            tracker.calls(),
            vec![Call::CreateIssue(NewIssue {
                title: "Weekly sync".to_string(),
                body: String::new(),
                labels: Vec::new(),
                assignees: Vec::new(),
            })]
        );
    }

    #[tokio::test]
    async fn first_run_without_predecessor_creates_only_the_issue() {
        let tracker = FakeTracker::new();
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.linked_comments = true;
        raw.body =
            "Agenda{{#if previousIssueNumber}}\nPreviously: #{{previousIssueNumber}}{{/if}}"
                .to_string();

        let outcome = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        assert!(outcome.previous.is_none());
        let created = created_issue(&tracker);
        assert_eq!(created.body, "Agenda");
        assert!(!created.body.contains("Previously"));
        assert_eq!(
            tracker.calls(),
            vec![
                Call::LatestOpenIssue(vec!["weekly".to_string()]),
                Call::CreateIssue(created),
            ]
        );
    }

    #[tokio::test]
    async fn rotation_moves_to_the_next_assignee() {
        let tracker = FakeTracker::new().with_previous(41, "I_41", &["alice"]);
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.assignees = "alice, bob".to_string();
        raw.rotate_assignees = true;
        raw.body = "Owner: {{assignees}}, previously #{{previousIssueNumber}}".to_string();

        let outcome = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        assert_eq!(outcome.assignees, vec!["bob"]);
        let created = created_issue(&tracker);
        assert_eq!(created.assignees, vec!["bob"]);
        assert_eq!(created.body, "Owner: bob, previously #41");
    }

    #[tokio::test]
    async fn rotation_without_predecessor_starts_at_the_front() {
        let tracker = FakeTracker::new();
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.assignees = "alice, bob".to_string();
        raw.rotate_assignees = true;

        let outcome = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        assert_eq!(outcome.assignees, vec!["alice"]);
    }

    #[tokio::test]
    async fn closes_unpins_then_pins_in_order() {
        let tracker = FakeTracker::new()
            .with_previous(41, "I_41", &[])
            .with_pinned(&["I_41"]);
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.close_previous = true;
        raw.pinned = true;

        Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        let created = created_issue(&tracker);
        assert_eq!(
            tracker.calls(),
            vec![
                Call::LatestOpenIssue(vec!["weekly".to_string()]),
                Call::CreateIssue(created),
                Call::CloseIssue(41),
                Call::PinnedIssues,
                Call::Unpin("I_41".to_string()),
                Call::Pin(NEW_ISSUE_NODE_ID.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unpinned_predecessor_is_not_unpinned_again() {
        let tracker = FakeTracker::new().with_previous(41, "I_41", &[]);
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.close_previous = true;
        raw.pinned = true;

        Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        let created = created_issue(&tracker);
        assert_eq!(
            tracker.mutations(),
            vec![
                Call::CreateIssue(created),
                Call::CloseIssue(41),
                Call::Pin(NEW_ISSUE_NODE_ID.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn pinning_only_happens_alongside_closing() {
        let tracker = FakeTracker::new().with_previous(41, "I_41", &[]);
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.pinned = true;

        Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        assert_eq!(tracker.mutations(), vec![Call::CreateIssue(created_issue(&tracker))]);
    }

    #[tokio::test]
    async fn linked_comments_precede_closing() {
        let tracker = FakeTracker::new().with_previous(41, "I_41", &[]);
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.linked_comments = true;
        raw.close_previous = true;

        Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        let created = created_issue(&tracker);
        assert_eq!(
            tracker.mutations(),
            vec![
                Call::CreateIssue(created),
                Call::Comment(42, "Previous in series: #41".to_string()),
                Call::Comment(41, "Next in series: #42".to_string()),
                Call::CloseIssue(41),
            ]
        );
    }

    #[tokio::test]
    async fn attaches_project_then_milestone() {
        let tracker = FakeTracker::new()
            .with_project_pages(&[&[(700, 7, "Rituals")]])
            .with_column_pages(700, &[&[(71, "Backlog")]]);
        let mut raw = inputs("Weekly sync");
        raw.project = "7".to_string();
        raw.column = "Backlog".to_string();
        raw.milestone = "3".to_string();

        Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect("run succeeds");

        let created = created_issue(&tracker);
        assert_eq!(
            tracker.mutations(),
            vec![
                Call::CreateIssue(created),
                Call::CreateCard(71, NEW_ISSUE_DATABASE_ID),
                Call::SetMilestone(NEW_ISSUE_NUMBER, 3),
            ]
        );
    }

    #[tokio::test]
    async fn missing_column_fails_after_the_issue_exists() {
        let tracker = FakeTracker::new()
            .with_project_pages(&[&[(700, 7, "Rituals")]])
            .with_column_pages(700, &[&[(70, "Todo")]]);
        let mut raw = inputs("Weekly sync");
        raw.project = "7".to_string();
        raw.column = "Backlog".to_string();
        raw.milestone = "3".to_string();

        let err = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect_err("column missing");

        assert_eq!(err.created_issue(), Some(IssueNumber::new(NEW_ISSUE_NUMBER)));
        match err.root() {
            LifecycleError::NotFound(NotFoundError::Column { project, column }) => {
                assert_eq!(project.as_u64(), 7);
                assert_eq!(column, "Backlog");
            }
            other => panic!("expected column not found, got {other:?}"),
        }
        assert!(matches!(
            err,
            LifecycleError::PartialCompletion {
                step: RunStep::AttachingProject,
                ..
            }
        ));
        // The milestone step never ran.
        assert!(!tracker
            .calls()
            .iter()
            .any(|call| matches!(call, Call::SetMilestone(..))));
    }

    #[tokio::test]
    async fn failed_creation_is_not_a_partial_completion() {
        let tracker = FakeTracker::new().failing("create issue");

        let err = Orchestrator::new(&tracker)
            .run(&inputs("Weekly sync"))
            .await
            .expect_err("creation fails");

        assert!(matches!(err, LifecycleError::Transport(_)));
        assert_eq!(err.created_issue(), None);
    }

    #[tokio::test]
    async fn failed_close_stops_before_pinning() {
        let tracker = FakeTracker::new()
            .with_previous(41, "I_41", &[])
            .with_pinned(&["I_41"])
            .failing("close issue");
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.close_previous = true;
        raw.pinned = true;

        let err = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect_err("close fails");

        assert!(matches!(
            err,
            LifecycleError::PartialCompletion {
                step: RunStep::ClosingPrevious,
                ..
            }
        ));
        assert!(!tracker
            .calls()
            .iter()
            .any(|call| matches!(call, Call::PinnedIssues | Call::Pin(_))));
    }

    #[tokio::test]
    async fn failed_unpin_still_pins_the_new_issue() {
        let tracker = FakeTracker::new()
            .with_previous(41, "I_41", &[])
            .with_pinned(&["I_41"])
            .failing("unpin issue");
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.close_previous = true;
        raw.pinned = true;

        let err = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect_err("unpin fails");

        assert!(matches!(
            err,
            LifecycleError::PartialCompletion {
                step: RunStep::Unpinning,
                ..
            }
        ));
        assert_eq!(
            tracker.calls().last(),
            Some(&Call::Pin(NEW_ISSUE_NODE_ID.to_string()))
        );
    }

    #[tokio::test]
    async fn failed_pin_is_reported() {
        let tracker = FakeTracker::new()
            .with_previous(41, "I_41", &[])
            .failing("pin issue");
        let mut raw = inputs("Weekly sync");
        raw.labels = "weekly".to_string();
        raw.close_previous = true;
        raw.pinned = true;

        let err = Orchestrator::new(&tracker)
            .run(&raw)
            .await
            .expect_err("pin fails");

        assert_eq!(err.created_issue(), Some(IssueNumber::new(NEW_ISSUE_NUMBER)));
        assert!(err.to_string().contains("pinning the new issue"));
    }
}
