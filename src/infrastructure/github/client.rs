use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::domain::entities::app_config::REPOSITORY_PAGE_SIZE;
use crate::domain::entities::repository::RepositoryDescriptor;

#[derive(Debug, Error)]
pub enum RepositoryListingError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Could not decode repository list from {url}: {source}")]
    DecodeFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Lists the repositories that make up an organization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryDescriptor>, RepositoryListingError>;
}

/// GitHub REST client for the `/users/{org}/repos` listing
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    page_size: u32,
}

impl GitHubClient {
    pub fn new(api_base: impl Into<String>) -> Result<Self, RepositoryListingError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        // GitHub rejects requests without a User-Agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("forkctl/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(RepositoryListingError::ClientBuildFailed)?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            page_size: REPOSITORY_PAGE_SIZE,
        })
    }

    pub fn listing_url(&self, organization: &str) -> String {
        format!(
            "{}/users/{}/repos?per_page={}",
            self.api_base, organization, self.page_size
        )
    }
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryDescriptor>, RepositoryListingError> {
        let url = self.listing_url(organization);
        tracing::debug!(%url, "listing repositories");

        let response = self.client.get(&url).send().await.map_err(|source| {
            RepositoryListingError::RequestFailed {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RepositoryListingError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RepositoryListingError::RequestFailed {
                url: url.clone(),
                source,
            })?;

        let repos: Vec<RepositoryDescriptor> = serde_json::from_slice(&body)
            .map_err(|source| RepositoryListingError::DecodeFailed { url, source })?;

        tracing::info!(organization, count = repos.len(), "repository listing received");
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url() {
        let client = GitHubClient::new("https://api.github.com/").unwrap();
        assert_eq!(
            client.listing_url("networkgcorefullcode"),
            "https://api.github.com/users/networkgcorefullcode/repos?per_page=100"
        );
    }

    #[test]
    fn test_default_config_targets_public_api() {
        use crate::domain::entities::app_config::{AppConfig, GITHUB_ORGANIZATION};

        let client = GitHubClient::new(AppConfig::default().github_api_base).unwrap();
        assert_eq!(
            client.listing_url(GITHUB_ORGANIZATION),
            "https://api.github.com/users/networkgcorefullcode/repos?per_page=100"
        );
    }
}
