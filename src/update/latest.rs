//! Latest known Gradle version
//!
//! A context object owned by the caller instead of a process-wide global.
//! Readers get an explicit `NotYetAvailable` until the first successful
//! refresh; a failed refresh keeps the previous value.

use crate::domain::GradleVersion;
use crate::error::{NotYetAvailable, RegistryError};
use crate::registry::VersionFeed;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// A fetched version and when it was fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatestSnapshot {
    pub version: GradleVersion,
    pub refreshed_at: DateTime<Utc>,
}

/// Cell holding the latest known Gradle version
#[derive(Debug, Default)]
pub struct LatestVersion {
    snapshot: RwLock<Option<LatestSnapshot>>,
}

impl LatestVersion {
    /// Create an empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell already holding `version`
    pub fn with_version(version: GradleVersion) -> Self {
        let cell = Self::new();
        cell.set(version);
        cell
    }

    /// Current snapshot, `NotYetAvailable` before the first refresh
    pub fn get(&self) -> Result<LatestSnapshot, NotYetAvailable> {
        let snapshot = *self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        snapshot.ok_or(NotYetAvailable)
    }

    /// Current version, `NotYetAvailable` before the first refresh
    pub fn version(&self) -> Result<GradleVersion, NotYetAvailable> {
        self.get().map(|snapshot| snapshot.version)
    }

    /// Whether a version has been fetched
    pub fn is_available(&self) -> bool {
        self.get().is_ok()
    }

    /// Replace the value, stamped with the current time
    pub fn set(&self, version: GradleVersion) {
        self.set_at(version, Utc::now());
    }

    /// Replace the value with an explicit timestamp
    pub fn set_at(&self, version: GradleVersion, refreshed_at: DateTime<Utc>) {
        let mut slot = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(LatestSnapshot {
            version,
            refreshed_at,
        });
    }

    /// Fetch the latest stable version from `feed` and store it
    ///
    /// On failure the previous value is kept and the error is returned.
    pub async fn refresh(&self, feed: &dyn VersionFeed) -> Result<GradleVersion, RegistryError> {
        match feed.latest_stable().await {
            Ok(version) => {
                debug!(feed = feed.feed_name(), %version, "latest Gradle version refreshed");
                self.set(version);
                Ok(version)
            }
            Err(e) => {
                warn!(feed = feed.feed_name(), error = %e, "failed to refresh latest Gradle version");
                Err(e)
            }
        }
    }
}
