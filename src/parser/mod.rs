//! Build script readers
//!
//! This module provides the two readers used on build script text:
//! - Kotlin DSL scanner (calls, plugin requests, blocks)
//! - Groovy DSL intake for text pasted from Groovy scripts

pub mod groovy;
pub mod kotlin;

pub use groovy::{find_dependencies, find_plugins, ForeignDependency};
pub use kotlin::{
    line_col, may_declare_dependency, parse_call, parse_call_in, scan, single_quoted_literals,
    Block, PluginEntry, PluginRequestKind, ScannedCall, ScriptScan,
};
