//! Recurring-issue lifecycle domain.
//!
//! This crate contains every domain concept used by the bot: identifiers,
//! value types, errors, input validation, assignee rotation, body rendering,
//! and the tracker port traits. Infrastructure crates implement the ports; they
//! never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed from a tracker; the `github` crate defines *how*
//! to supply it, and the `engine` crate sequences the calls.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`IssueNumber`, `IssueNodeId`, etc.) |
//! | [`types`] | Shared value types (`ProjectScope`, `CreatedIssue`, `Page`, etc.) |
//! | [`errors`] | Config, port, and run-level error types |
//! | [`config`] | Raw inputs → validated [`RunConfig`] |
//! | [`rotation`] | Round-robin assignee selection |
//! | [`template`] | Issue body placeholder substitution |
//! | [`ports`] | `IssueTracker`, `PinBoard`, `ProjectBoard` traits |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod rotation;
pub mod template;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{split_list, Features, ProjectTarget, RawInputs, RunConfig};
pub use errors::{
    ConfigError, ConfigViolation, LifecycleError, NotFoundError, RunStep, TrackerError,
};
pub use identifiers::{
    ColumnId, IssueDatabaseId, IssueNodeId, IssueNumber, MilestoneNumber, ProjectId,
    ProjectNumber, RepositoryId, RunId,
};
pub use ports::{IssueTracker, PinBoard, ProjectBoard, Tracker};
pub use rotation::next_assignee;
pub use template::{render_body, TemplateContext};
pub use types::{
    issue_exists, ColumnSummary, CreatedIssue, IssueState, NewIssue, Page, PreviousIssueRef,
    ProjectColumn, ProjectScope, ProjectSummary, NO_PREDECESSOR,
};
