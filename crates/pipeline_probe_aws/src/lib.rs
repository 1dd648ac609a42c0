//! AWS-oriented adapters and handlers for pipeline probing.
//!
//! This crate owns runtime integration details (adapter seams for Lambda,
//! CloudWatch Logs, S3 and SQS, the stage checkers, the probe orchestrator and
//! the compute function handler). Domain primitives come from
//! `pipeline_probe_core`.

pub mod adapters;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod logging;
