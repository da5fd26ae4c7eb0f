//! Gradle update judgment
//!
//! This module provides:
//! - The latest known Gradle version and its refresh from a release feed
//! - The outdatedness classifier consumed by the wrapper check

mod classifier;
mod latest;

pub use classifier::{classify, classify_against, OutdatednessReport, Severity};
pub use latest::{LatestSnapshot, LatestVersion};
