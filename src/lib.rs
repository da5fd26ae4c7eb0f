//! gradle-assist - Gradle build script assistant library
//!
//! This library provides:
//! - Dependency declaration formats (notation, named, positional, semi-named)
//!   and conversion between them
//! - Inspections of Kotlin DSL build scripts with quick fixes
//! - Conversion of Groovy DSL text pasted into Kotlin DSL scripts
//! - Gradle wrapper version checks against the latest release

pub mod cli;
pub mod convert;
pub mod domain;
pub mod error;
pub mod format;
pub mod gradle_sync;
pub mod inspection;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod rewrite;
pub mod settings;
pub mod update;
pub mod wrapper;
