//! Error types for geocluster.

use thiserror::Error;

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors produced while configuring a cluster map.
///
/// The engine itself performs no fallible I/O: lifecycle events for
/// unknown markers are tolerated as no-ops and malformed positions are
/// clamped, so errors only arise from configuration handling.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A JSON configuration document failed to parse.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
