//! Release feed adapters for fetching the latest Gradle version
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - Gradle services version feed adapter
//! - Stable release selection shared by every feed

mod client;
mod gradle_services;

pub use client::HttpClient;
pub use gradle_services::{GradleServicesFeed, DEFAULT_FEED_URL};

use crate::domain::GradleVersion;
use crate::error::RegistryError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// One entry of a release feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDescriptor {
    pub version: String,
    #[serde(default)]
    pub nightly: bool,
    #[serde(default)]
    pub release_nightly: bool,
    #[serde(default)]
    pub snapshot: bool,
    #[serde(default)]
    pub broken: bool,
    #[serde(default)]
    pub active_rc: bool,
    /// Set to the targeted release for release candidates
    #[serde(default)]
    pub rc_for: String,
    /// Set to the targeted release for milestones
    #[serde(default)]
    pub milestone_for: String,
}

impl ReleaseDescriptor {
    /// Descriptor of a stable release
    pub fn stable(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            nightly: false,
            release_nightly: false,
            snapshot: false,
            broken: false,
            active_rc: false,
            rc_for: String::new(),
            milestone_for: String::new(),
        }
    }

    /// Whether the release is a release candidate or milestone
    pub fn is_release_candidate(&self) -> bool {
        self.active_rc || !self.rc_for.is_empty() || !self.milestone_for.is_empty()
    }

    /// Whether the release counts as a stable release
    pub fn is_stable(&self) -> bool {
        !(self.nightly
            || self.release_nightly
            || self.snapshot
            || self.broken
            || self.is_release_candidate())
    }
}

/// Source of Gradle releases
#[async_trait]
pub trait VersionFeed: Send + Sync {
    /// Name used in messages and errors
    fn feed_name(&self) -> &str;

    /// Fetch every release descriptor
    async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, RegistryError>;

    /// Fetch the feed and select the latest stable release
    async fn latest_stable(&self) -> Result<GradleVersion, RegistryError> {
        let releases = self.fetch_releases().await?;
        select_latest_stable(self.feed_name(), &releases)
    }
}

/// Highest stable version of `releases`
///
/// Entries flagged as nightly, snapshot or release candidate are skipped,
/// as are versions that do not parse. The maximum is taken with the natural
/// version ordering.
pub fn select_latest_stable(
    feed: &str,
    releases: &[ReleaseDescriptor],
) -> Result<GradleVersion, RegistryError> {
    releases
        .iter()
        .filter(|release| release.is_stable())
        .filter_map(|release| match GradleVersion::parse(&release.version) {
            Ok(version) => Some(version),
            Err(e) => {
                debug!(feed, version = %release.version, error = %e, "skipping feed entry");
                None
            }
        })
        .max()
        .ok_or_else(|| RegistryError::no_stable_release(feed))
}
