//! Helpers shared by the adapter's HTTP tests.

use httpmock::MockServer;
use lifecycle::RepositoryId;

use crate::client::{GithubClient, GithubConfig};

/// A client for `owner/repo` pointed at `server` for both REST and GraphQL.
pub(crate) fn client_for(server: &MockServer) -> GithubClient {
    let repository = RepositoryId::parse("owner/repo").expect("repository");
    let mut config = GithubConfig::new(repository, "token");
    config.api_url = server.base_url();
    config.graphql_url = server.url("/graphql");
    GithubClient::new(config).expect("client")
}
