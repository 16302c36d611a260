//! Error types for the recurring-issue lifecycle.
//!
//! Three layers:
//!
//! - [`ConfigError`]: the inputs cannot describe a satisfiable run. Produced
//!   before any network call.
//! - [`TrackerError`]: a single port call failed. Produced by infrastructure
//!   adapters (e.g. the `github` crate) and test doubles.
//! - [`LifecycleError`]: the run-level failure reported to the caller. Wraps the
//!   two above, and marks failures that happened after the new issue already
//!   existed as [`LifecycleError::PartialCompletion`].
//!
//! Nothing here is retried. Every remote operation is attempted at most once per
//! run.

use thiserror::Error;

use crate::{IssueNumber, ProjectNumber, ProjectScope};

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A single input rule that the supplied configuration breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("title must not be empty")]
    MissingTitle,

    #[error("project-scope '{0}' must be one of repository, user, organization")]
    UnknownProjectScope(String),

    /// A predecessor-dependent feature was requested without labels to find
    /// the predecessor by.
    #[error("{feature} requires at least one label")]
    LabelsRequired {
        /// Input name of the feature (e.g. `"pinned"`).
        feature: &'static str,
    },

    #[error("rotate-assignees requires at least one assignee")]
    AssigneesRequired,

    #[error("project requires a column")]
    ColumnRequired,

    #[error("column requires a project")]
    ProjectRequired,

    /// A numeric input did not parse as a positive integer.
    #[error("{input} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Input name (e.g. `"milestone"`).
        input: &'static str,
        /// The raw value as supplied.
        value: String,
    },
}

/// Every rule the supplied inputs break, in evaluation order.
///
/// Never empty: a configuration with no violations is accepted instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    violations: Vec<ConfigViolation>,
}

impl ConfigError {
    pub(crate) fn new(violations: Vec<ConfigViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// The broken rules.
    pub fn violations(&self) -> &[ConfigViolation] {
        &self.violations
    }

    /// Returns `true` if `violation` is among the broken rules.
    pub fn contains(&self, violation: &ConfigViolation) -> bool {
        self.violations.contains(violation)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid inputs: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Failure of a single tracker call.
///
/// `operation` is a short human-readable label such as `"create issue"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The tracker reported that the addressed resource does not exist or
    /// cannot be referenced (HTTP 404 / 410 / 422).
    #[error("{operation} failed: {message}")]
    NotFound {
        operation: &'static str,
        message: String,
    },

    /// Any other non-success HTTP status (auth, rate limit, server error).
    #[error("{operation} failed with status {status}: {message}")]
    Status {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// The GraphQL endpoint answered with an `errors` array.
    #[error("{operation} returned GraphQL errors: {message}")]
    GraphQl {
        operation: &'static str,
        message: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("{operation} request failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// A lookup that the run depends on came back empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("no project with number {number} exists in {scope} scope")]
    Project {
        scope: ProjectScope,
        number: ProjectNumber,
    },

    #[error("project {project} has no column named '{column}'")]
    Column {
        project: ProjectNumber,
        column: String,
    },

    /// The tracker itself rejected a reference (e.g. an unknown milestone).
    #[error(transparent)]
    Remote(TrackerError),
}

/// The step of a run at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStep {
    Validating,
    LocatingPredecessor,
    Rendering,
    Creating,
    AttachingProject,
    AttachingMilestone,
    Linking,
    ClosingPrevious,
    Unpinning,
    Pinning,
}

impl std::fmt::Display for RunStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validating => "validating inputs",
            Self::LocatingPredecessor => "locating the previous issue",
            Self::Rendering => "rendering the issue body",
            Self::Creating => "creating the issue",
            Self::AttachingProject => "adding the issue to the project column",
            Self::AttachingMilestone => "setting the milestone",
            Self::Linking => "posting linking comments",
            Self::ClosingPrevious => "closing the previous issue",
            Self::Unpinning => "unpinning the previous issue",
            Self::Pinning => "pinning the new issue",
        };
        f.write_str(s)
    }
}

/// The single failure a run reports.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The inputs were rejected; nothing was sent to the tracker.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Network, auth, rate-limit or protocol failure.
    #[error("tracker error: {0}")]
    Transport(TrackerError),

    /// A step after issue creation failed. The issue exists in the tracker and
    /// is left as-is.
    #[error("issue #{issue} was created, but {step} failed: {source}")]
    PartialCompletion {
        /// Number of the issue created during this run.
        issue: IssueNumber,
        /// The step that failed.
        step: RunStep,
        #[source]
        source: Box<LifecycleError>,
    },
}

impl From<TrackerError> for LifecycleError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::NotFound { .. } => Self::NotFound(NotFoundError::Remote(err)),
            other => Self::Transport(other),
        }
    }
}

impl LifecycleError {
    /// Wraps `self` as a failure that happened after `issue` was created.
    ///
    /// Already-wrapped errors are returned unchanged.
    pub fn after_creation(self, issue: IssueNumber, step: RunStep) -> Self {
        match self {
            wrapped @ Self::PartialCompletion { .. } => wrapped,
            other => Self::PartialCompletion {
                issue,
                step,
                source: Box::new(other),
            },
        }
    }

    /// The issue created before the failure, if any.
    pub fn created_issue(&self) -> Option<IssueNumber> {
        match self {
            Self::PartialCompletion { issue, .. } => Some(*issue),
            _ => None,
        }
    }

    /// The underlying error, looking through [`LifecycleError::PartialCompletion`].
    pub fn root(&self) -> &LifecycleError {
        match self {
            Self::PartialCompletion { source, .. } => source.root(),
            other => other,
        }
    }
}
