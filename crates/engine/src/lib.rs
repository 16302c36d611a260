//! Recurring-issue lifecycle engine.
//!
//! This crate sequences one run of the bot: find the previous issue, rotate
//! the assignee, render the body, create the issue, attach it to a project
//! column and milestone, link it to its predecessor, close the predecessor, and
//! move the pin.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Components here sequence calls between business
//! logic in the [`lifecycle`] crate and the tracker port traits. They contain no
//! transport details; every component borrows a single tracker handle that the
//! caller constructs once per run.
//!
//! | Component | Module |
//! |-----------|--------|
//! | [`PreviousIssueLocator`] | [`predecessor`] |
//! | [`PinManager`] | [`pins`] |
//! | [`ProjectColumnResolver`] | [`project`] |
//! | [`MilestoneAssigner`] | [`milestone`] |
//! | [`CommentLinker`] | [`links`] |
//! | [`Orchestrator`] | [`orchestrator`] |

pub mod links;
pub mod milestone;
pub mod orchestrator;
pub mod pins;
pub mod predecessor;
pub mod project;

#[cfg(test)]
mod test_support;

pub use links::CommentLinker;
pub use milestone::MilestoneAssigner;
pub use orchestrator::{Orchestrator, RunOutcome};
pub use pins::{PinManager, UnpinOutcome};
pub use predecessor::PreviousIssueLocator;
pub use project::ProjectColumnResolver;
