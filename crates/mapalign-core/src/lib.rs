//! Core infrastructure for mapalign.
//!
//! This crate cross-references independently produced name mappings of the
//! same obfuscated JVM classes and aligns them across the class hierarchy:
//! - Mapping tree with one source and many destination namespaces
//! - Tiny v2 reading and writing
//! - JVM access flags and descriptor equivalence
//! - Analysis: problem detection with deferred resolutions
//! - Configuration and resolution policy
//! - Error types and error codes
//! - JSON output types for CLI responses

pub mod access;
pub mod analysis;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod output;
pub mod tree;
