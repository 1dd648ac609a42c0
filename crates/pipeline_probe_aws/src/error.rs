//! Binary-level error types and exit code mapping.

use pipeline_probe_core::config::ProbeConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("configuration error: {0}")]
    Config(#[from] ProbeConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    /// The blocking probe task panicked or was cancelled.
    #[error("probe task failed: {0}")]
    Task(String),
}

impl ProbeError {
    /// | Code | Meaning                |
    /// |------|------------------------|
    /// | 1    | Probe could not run    |
    /// | 2    | Invalid configuration  |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Logging(_) | Self::Task(_) => 1,
        }
    }
}
