//! Gradle services version feed adapter
//!
//! Fetches the list of Gradle releases.
//! API endpoint: https://services.gradle.org/versions/all
//!
//! Each entry carries the version and flags such as `nightly`, `snapshot`,
//! `activeRc` and `rcFor`.

use crate::error::RegistryError;
use crate::registry::{HttpClient, ReleaseDescriptor, VersionFeed};
use async_trait::async_trait;

/// Gradle services feed URL
pub const DEFAULT_FEED_URL: &str = "https://services.gradle.org/versions/all";

/// Feed listing every Gradle release
pub struct GradleServicesFeed {
    client: HttpClient,
    url: String,
}

impl GradleServicesFeed {
    /// Create a feed reading the default endpoint
    pub fn new(client: HttpClient) -> Self {
        Self::with_url(client, DEFAULT_FEED_URL)
    }

    /// Create a feed reading a custom endpoint
    pub fn with_url(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl VersionFeed for GradleServicesFeed {
    fn feed_name(&self) -> &str {
        &self.url
    }

    async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, RegistryError> {
        self.client.get_json(&self.url).await
    }
}
