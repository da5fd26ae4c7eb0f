//! Plugin declarations and their Kotlin DSL rendering
//!
//! Rendering rules:
//! - Core Gradle plugins (`org.gradle.` namespace optional) render as the bare
//!   accessor, back-ticked when the id contains a hyphen: `application`,
//!   `` `java-library` ``
//! - Kotlin plugins (`org.jetbrains.kotlin.<module>`) render as `kotlin("<module>")`
//! - Anything else renders as `id("<id>")`
//!
//! The last two append ` version "<version>"` when a version is known.

use serde::Serialize;
use std::ops::Range;

/// Namespace of plugins shipped with Gradle
pub const GRADLE_NAMESPACE: &str = "org.gradle.";

/// Namespace of Kotlin Gradle plugins
pub const KOTLIN_NAMESPACE: &str = "org.jetbrains.kotlin.";

/// Ids of plugins shipped with Gradle itself
pub const BUILT_IN_PLUGINS: &[&str] = &[
    "project-report",
    "project-reports",
    "help-tasks",
    "binary-base",
    "component-base",
    "language-base",
    "lifecycle-base",
    "build-dashboard",
    "reporting-base",
    "java-lang",
    "jvm-resources",
    "jvm-component",
    "application",
    "base",
    "distribution",
    "groovy-base",
    "groovy",
    "java-base",
    "java-library-distribution",
    "java-library",
    "java-platform",
    "java-test-fixtures",
    "java",
    "jvm-ecosystem",
    "version-catalog",
    "war",
    "junit-test-suite",
    "publishing",
    "antlr",
    "build-init",
    "wrapper",
    "checkstyle",
    "codenarc",
    "pmd",
    "ear",
    "eclipse-wtp",
    "eclipse",
    "idea",
    "visual-studio",
    "xcode",
    "play-ide",
    "ivy-publish",
    "jacoco",
    "coffeescript-base",
    "envjs",
    "javascript-base",
    "jshint",
    "rhino",
    "assembler-lang",
    "assembler",
    "c-lang",
    "c",
    "cpp-application",
    "cpp-lang",
    "cpp-library",
    "cpp",
    "objective-c-lang",
    "objective-c",
    "objective-cpp-lang",
    "objective-cpp",
    "swift-application",
    "swift-library",
    "swiftpm-export",
    "windows-resource-script",
    "windows-resources",
    "scala-lang",
    "maven-publish",
    "maven",
    "clang-compiler",
    "gcc-compiler",
    "microsoft-visual-cpp-compiler",
    "native-component-model",
    "native-component",
    "standard-tool-chains",
    "play-application",
    "play-coffeescript",
    "play-javascript",
    "play",
    "groovy-gradle-plugin",
    "java-gradle-plugin",
    "scala-base",
    "scala",
    "signing",
    "cpp-unit-test",
    "cunit-test-suite",
    "cunit",
    "google-test-test-suite",
    "google-test",
    "xctest",
];

/// A plugin request such as `id("x") version "y"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDeclaration {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Source range of the whole request
    #[serde(skip)]
    pub range: Range<usize>,
}

/// Returns the core plugin name when `id` denotes a plugin shipped with Gradle
pub fn built_in_name(id: &str) -> Option<&str> {
    let name = id.strip_prefix(GRADLE_NAMESPACE).unwrap_or(id);
    BUILT_IN_PLUGINS.contains(&name).then_some(name)
}

/// Returns the module of a Kotlin plugin id
pub fn kotlin_module(id: &str) -> Option<&str> {
    id.strip_prefix(KOTLIN_NAMESPACE)
        .filter(|module| !module.is_empty())
}

impl PluginDeclaration {
    pub fn new(id: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            version,
            range: 0..0,
        }
    }

    /// Attach the source range
    pub fn with_range(mut self, range: Range<usize>) -> Self {
        self.range = range;
        self
    }

    /// Whether Gradle ships this plugin
    pub fn is_built_in(&self) -> bool {
        built_in_name(&self.id).is_some()
    }

    /// Render as a Kotlin DSL plugin request
    pub fn render(&self) -> String {
        if let Some(name) = built_in_name(&self.id) {
            return if name.contains('-') {
                format!("`{}`", name)
            } else {
                name.to_string()
            };
        }

        let mut out = match kotlin_module(&self.id) {
            Some(module) => format!("kotlin(\"{}\")", module),
            None => format!("id(\"{}\")", self.id),
        };
        if let Some(version) = &self.version {
            out.push_str(&format!(" version \"{}\"", version));
        }
        out
    }
}
