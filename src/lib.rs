//! mapalign: cross-namespace consistency for JVM name mappings
//!
//! Cross-references independently produced name mappings of the same
//! obfuscated classes, detects naming defects (phantom and synthetic
//! members, unnamed inner classes, inconsistently named overrides) and
//! applies the fixes the caller selects.

// Core infrastructure - re-exported from mapalign-core
pub use mapalign_core::access;
pub use mapalign_core::analysis;
pub use mapalign_core::config;
pub use mapalign_core::descriptor;
pub use mapalign_core::error;
pub use mapalign_core::output;
pub use mapalign_core::tree;

// Front door
pub mod cli;
