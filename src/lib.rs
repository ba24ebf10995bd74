//! Core library for blocklist-merge.
//!
//! The pipeline is a single linear transformation: a raw list of candidate
//! domains is normalized ([`raw`]), merged into one section of a sectioned
//! target document ([`target`], [`merge`]), and rendered back to
//! deterministic bytes ([`render`]). The [`cli`] module orchestrates one
//! invocation end to end.

pub mod cli;
pub mod config;
pub mod domain;
pub mod merge;
pub mod raw;
pub mod render;
pub mod target;
pub mod utils;
