//! Release-metadata query against the upstream hosting service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::contract::ReleaseSource;
use crate::errors::VersionQueryError;

const USER_AGENT: &str = concat!("telegraf-companion/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The release convention is that the tag name matches the version number
/// (e.g. `v1.22.4`).
#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
}

/// [`ReleaseSource`] backed by the GitHub releases API.
pub struct GithubReleaseSource {
    client: Client,
    releases_url: String,
}

impl GithubReleaseSource {
    pub fn new(releases_url: impl Into<String>) -> Result<Self, VersionQueryError> {
        // GitHub's API rejects requests without a User-Agent.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            releases_url: releases_url.into(),
        })
    }

    async fn fetch(&self) -> Result<String, VersionQueryError> {
        let response = self.client.get(&self.releases_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VersionQueryError::Status(status));
        }
        let release: GithubRelease = response.json().await?;
        info!(tag = %release.tag_name, "fetched latest upstream release");
        Ok(release.tag_name)
    }
}

#[async_trait]
impl ReleaseSource for GithubReleaseSource {
    async fn latest_tag(&self) -> Result<String, VersionQueryError> {
        // One bounded retry on transport failure only; tree acquisition
        // downstream is a one-shot heavyweight operation that is never
        // retried, but the version query is cheap enough to try twice.
        match self.fetch().await {
            Ok(tag) => Ok(tag),
            Err(VersionQueryError::Transport(first)) => {
                debug!(error = %first, "release query failed, retrying once");
                self.fetch().await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_body_decodes_tag_name() {
        let body = r#"{"tag_name": "v1.30.0", "name": "v1.30.0", "draft": false}"#;
        let release: GithubRelease = serde_json::from_str(body).unwrap();
        assert_eq!(release.tag_name, "v1.30.0");
    }
}
