//! Shared pipeline probe domain primitives.
//!
//! This crate owns the stage contracts, the verdict rule table, the probe
//! configuration and the clock abstraction. It intentionally excludes AWS SDK
//! and Lambda runtime concerns; those live in `pipeline_probe_aws`.

pub mod clock;
pub mod config;
pub mod contract;
pub mod verdict;
