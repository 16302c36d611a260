//! Command-line and GitHub Actions input parsing.
//!
//! Every action input can be given as a flag or through the `INPUT_*`
//! variable the Actions runner sets for it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use github::{GithubConfig, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};
use lifecycle::{RawInputs, RepositoryId};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "issue-bot")]
#[command(about = "Create the next issue of a recurring series on GitHub")]
pub struct Cli {
    /// Title of the new issue
    #[arg(long, env = "INPUT_TITLE", default_value = "")]
    pub title: String,

    /// Body template of the new issue
    #[arg(long, env = "INPUT_BODY", default_value = "")]
    pub body: String,

    /// File holding the body template, read when --body is empty
    #[arg(long, env = "INPUT_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Comma-separated labels; also used to find the previous issue
    #[arg(long, env = "INPUT_LABELS", default_value = "")]
    pub labels: String,

    /// Comma-separated assignees
    #[arg(long, env = "INPUT_ASSIGNEES", default_value = "")]
    pub assignees: String,

    /// Where to look up --project: repository, user or organization
    #[arg(long, env = "INPUT_PROJECT-SCOPE", default_value = "")]
    pub project_scope: String,

    /// Project board number
    #[arg(long, env = "INPUT_PROJECT", default_value = "")]
    pub project: String,

    /// Column name on the project board
    #[arg(long, env = "INPUT_COLUMN", default_value = "")]
    pub column: String,

    /// Milestone number
    #[arg(long, env = "INPUT_MILESTONE", default_value = "")]
    pub milestone: String,

    /// Pin the new issue in place of the previous one
    #[arg(long, env = "INPUT_PINNED", action = ArgAction::Set, num_args = 0..=1,
          default_value = "false", default_missing_value = "true", value_parser = parse_flag)]
    pub pinned: bool,

    /// Close the previous issue
    #[arg(long, env = "INPUT_CLOSE-PREVIOUS", action = ArgAction::Set, num_args = 0..=1,
          default_value = "false", default_missing_value = "true", value_parser = parse_flag)]
    pub close_previous: bool,

    /// Hand the issue to the assignee after the previous one's
    #[arg(long, env = "INPUT_ROTATE-ASSIGNEES", action = ArgAction::Set, num_args = 0..=1,
          default_value = "false", default_missing_value = "true", value_parser = parse_flag)]
    pub rotate_assignees: bool,

    /// Cross-link the new and previous issues with comments
    #[arg(long, env = "INPUT_LINKED-COMMENTS", action = ArgAction::Set, num_args = 0..=1,
          default_value = "false", default_missing_value = "true", value_parser = parse_flag)]
    pub linked_comments: bool,

    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// API token
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Fallback token supplied by the runner
    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub github_token: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// GraphQL endpoint URL
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    pub graphql_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "ISSUE_BOT_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// File that receives step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, env = "ISSUE_BOT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Actions passes every boolean input as a string; unset inputs arrive empty.
fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}

impl Cli {
    /// The raw action inputs, with the body taken from --template when
    /// --body is empty.
    pub fn raw_inputs(&self) -> Result<RawInputs> {
        Ok(RawInputs {
            title: self.title.clone(),
            body: resolve_body(&self.body, self.template.as_deref())?,
            labels: self.labels.clone(),
            assignees: self.assignees.clone(),
            project_scope: self.project_scope.clone(),
            project: self.project.clone(),
            column: self.column.clone(),
            milestone: self.milestone.clone(),
            pinned: self.pinned,
            close_previous: self.close_previous,
            rotate_assignees: self.rotate_assignees,
            linked_comments: self.linked_comments,
        })
    }

    pub fn github_config(&self) -> Result<GithubConfig> {
        let Some(repository) = RepositoryId::parse(&self.repository) else {
            bail!(
                "repository must be in owner/name form, got '{}'",
                self.repository
            );
        };

        let token = [self.token.as_deref(), self.github_token.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|token| !token.is_empty())
            .context("no GitHub token; set INPUT_TOKEN or GITHUB_TOKEN")?;

        Ok(GithubConfig {
            repository,
            token: token.to_string(),
            api_url: self.api_url.clone(),
            graphql_url: self.graphql_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

/// An explicit body wins. Otherwise the template file is read; a missing
/// file yields an empty body.
fn resolve_body(body: &str, template: Option<&Path>) -> Result<String> {
    if !body.is_empty() {
        return Ok(body.to_string());
    }
    let Some(path) = template.filter(|path| !path.as_os_str().is_empty()) else {
        return Ok(String::new());
    };

    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "template file not found; using an empty body");
            Ok(String::new())
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to read template {}", path.display()))
        }
    }
}
