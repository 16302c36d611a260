//! HTTP plumbing shared by every port implementation.
//!
//! One [`GithubClient`] is built per run and reused for every call. Requests
//! are sent exactly once; failures are classified into [`TrackerError`]
//! variants and returned.

use std::time::Duration;

use lifecycle::{Page, RepositoryId, TrackerError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Listing page size; GitHub's maximum.
pub(crate) const PER_PAGE: u32 = 100;

const MAX_ERROR_BODY_CHARS: usize = 800;

/// Connection settings for one run.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub repository: RepositoryId,
    pub token: String,
    pub api_url: String,
    pub graphql_url: String,
    pub timeout: Duration,
}

impl GithubConfig {
    /// Settings for the public GitHub endpoints.
    pub fn new(repository: RepositoryId, token: impl Into<String>) -> Self {
        Self {
            repository,
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// The client could not be constructed.
#[derive(Debug, Error)]
pub enum GithubConfigError {
    #[error("GitHub token is empty")]
    MissingToken,

    #[error("GitHub token is not a valid header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client")]
    Http(#[source] reqwest::Error),
}

/// GitHub API handle implementing the lifecycle tracker ports.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    repository: RepositoryId,
    api_url: String,
    graphql_url: String,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<V: Serialize> {
    query: &'static str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self, GithubConfigError> {
        let token = config.token.trim();
        if token.is_empty() {
            return Err(GithubConfigError::MissingToken);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("issue-bot"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(GithubConfigError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(GithubConfigError::Http)?;

        Ok(Self {
            http,
            repository: config.repository,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url,
        })
    }

    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }

    /// `{api_url}/{path}`; `path` has no leading slash.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// `{api_url}/repos/{owner}/{repo}/{path}`.
    pub(crate) fn repo_url(&self, path: &str) -> String {
        self.url(&format!(
            "repos/{}/{}/{}",
            self.repository.owner(),
            self.repository.name(),
            path
        ))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Sends `request` and fails on any non-success status.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, TrackerError> {
        debug!(operation, "github request");
        let response = request
            .send()
            .await
            .map_err(|err| TrackerError::Transport {
                operation,
                message: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(operation, status, &body))
    }

    /// Sends `request` and decodes a JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, TrackerError> {
        let response = self.send(operation, request).await?;
        decode(operation, response).await
    }

    /// Requests one page of a listing.
    ///
    /// The next page exists when the response's `Link` header advertises one.
    pub(crate) async fn send_page<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        page: u32,
    ) -> Result<Page<T>, TrackerError> {
        let request = request.query(&[
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ]);
        let response = self.send(operation, request).await?;
        let has_next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .is_some_and(has_next_link);
        let items: Vec<T> = decode(operation, response).await?;
        Ok(Page {
            items,
            next_page: has_next.then_some(page + 1),
        })
    }

    /// Runs a GraphQL document with bound variables.
    pub(crate) async fn graphql<V: Serialize, R: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<R, TrackerError> {
        let request = self
            .http
            .post(&self.graphql_url)
            .json(&GraphQlRequest { query, variables });
        let response: GraphQlResponse<R> = self.send_json(operation, request).await?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
            return Err(TrackerError::GraphQl {
                operation,
                message: messages.join(", "),
            });
        }

        response.data.ok_or_else(|| TrackerError::Decode {
            operation,
            message: "response has no data".to_string(),
        })
    }
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, TrackerError> {
    response.json::<T>().await.map_err(|err| TrackerError::Decode {
        operation,
        message: err.to_string(),
    })
}

/// Maps an unsuccessful status to a [`TrackerError`].
///
/// 404 and 410 mean the addressed resource is gone; 422 is GitHub's answer to
/// references it cannot resolve (e.g. an unknown milestone number).
fn classify_status(operation: &'static str, status: StatusCode, body: &str) -> TrackerError {
    let message = truncate_for_error(body, MAX_ERROR_BODY_CHARS);
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE | StatusCode::UNPROCESSABLE_ENTITY => {
            TrackerError::NotFound {
                operation,
                message: format!("status {}: {message}", status.as_u16()),
            }
        }
        _ => TrackerError::Status {
            operation,
            status: status.as_u16(),
            message,
        },
    }
}

fn has_next_link(link: &str) -> bool {
    link.split(',')
        .any(|part| part.split(';').skip(1).any(|param| param.trim() == r#"rel="next""#))
}

fn truncate_for_error(body: &str, max_chars: usize) -> String {
    let body = body.trim();
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let truncated: String = body.chars().take(max_chars).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_next_page_in_link_header() {
        let link = r#"<https://api.github.com/repositories/1/issues?page=2>; rel="next", <https://api.github.com/repositories/1/issues?page=5>; rel="last""#;
        assert!(has_next_link(link));

        let last = r#"<https://api.github.com/repositories/1/issues?page=1>; rel="prev", <https://api.github.com/repositories/1/issues?page=1>; rel="first""#;
        assert!(!has_next_link(last));
    }

    #[test]
    fn classifies_missing_resources_as_not_found() {
        for status in [
            StatusCode::NOT_FOUND,
            StatusCode::GONE,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert!(matches!(
                classify_status("set milestone", status, "{}"),
                TrackerError::NotFound { .. }
            ));
        }
        assert!(matches!(
            classify_status("create issue", StatusCode::FORBIDDEN, "rate limited"),
            TrackerError::Status { status: 403, .. }
        ));
    }

    #[test]
    fn truncates_long_error_bodies() {
        let body = "x".repeat(10);
        assert_eq!(truncate_for_error(&body, 4), "xxxx...");
        assert_eq!(truncate_for_error(" short ", 10), "short");
    }

    #[test]
    fn rejects_an_empty_token() {
        let repo = RepositoryId::parse("owner/repo").expect("repo");
        let err = GithubClient::new(GithubConfig::new(repo, "  ")).expect_err("empty token");
        assert!(matches!(err, GithubConfigError::MissingToken));
    }

    #[test]
    fn builds_repository_urls() {
        let repo = RepositoryId::parse("owner/repo").expect("repo");
        let mut config = GithubConfig::new(repo, "token");
        config.api_url = "http://localhost:1234/".to_string();
        let client = GithubClient::new(config).expect("client");
        assert_eq!(
            client.repo_url("issues/4"),
            "http://localhost:1234/repos/owner/repo/issues/4"
        );
        assert_eq!(client.url("projects/1/columns"), "http://localhost:1234/projects/1/columns");
    }
}
