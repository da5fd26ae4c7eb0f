//! Core domain models for gradle-assist
//!
//! This module contains the fundamental types used throughout the application:
//! - Gradle version model and the outdatedness classifier
//! - Argument expressions and the syntax-free dependency declaration
//! - Call occurrences extracted from build scripts
//! - Plugin declarations and their Kotlin DSL rendering

mod declaration;
mod expression;
mod occurrence;
mod plugin;
mod version;

pub use declaration::DependencyDeclaration;
pub use expression::{escape, template_segments, unescape, Expression, TemplateSegment};
pub use occurrence::{CallArgument, CallOccurrence};
pub use plugin::{
    built_in_name, kotlin_module, PluginDeclaration, BUILT_IN_PLUGINS, GRADLE_NAMESPACE,
    KOTLIN_NAMESPACE,
};
pub use version::{compare_outdatedness, GradleVersion, Outdatedness};
