//! GitHub infrastructure adapter.
//!
//! Implements the tracker ports defined in the [`lifecycle`] crate
//! (`IssueTracker`, `PinBoard`, `ProjectBoard`) for [`GithubClient`] using
//! `reqwest` against the REST and GraphQL APIs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Authentication, pagination headers, and status classification are handled
//! here; the [`lifecycle`] and `engine` crates never see them.
//!
//! Every request is sent once. There are no retries; a failed call surfaces as
//! a [`lifecycle::TrackerError`] naming the operation.
//!
//! | Module | Port |
//! |--------|------|
//! | `issues` | `IssueTracker` (REST) |
//! | `pins` | `PinBoard` (GraphQL) |
//! | `projects` | `ProjectBoard` (REST, classic projects) |

mod client;
mod issues;
mod models;
mod pins;
mod projects;

#[cfg(test)]
mod test_support;

pub use client::{
    GithubClient, GithubConfig, GithubConfigError, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL,
};
