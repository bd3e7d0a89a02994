use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by the loader, the pipeline and the config layer
// ---------------------------------------------------------------------------

/// Errors surfaced to the UI layer. None of them are retried: every
/// operation is local and deterministic.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Source file missing, unreadable or malformed. No partial dataset is kept.
    #[error("failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The source parsed fine but contained no rows.
    #[error("{origin} contains no records")]
    EmptyDataset { origin: String },

    /// A price range whose lower bound exceeds its upper bound.
    #[error("invalid price range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("unknown income band '{0}' (expected low, medium or high)")]
    UnknownIncomeBand(String),
}

impl DashboardError {
    /// Flatten an `anyhow` chain into a [`DashboardError::Load`].
    pub(crate) fn load(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        DashboardError::Load {
            path: path.into(),
            message: format!("{err:#}"),
        }
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
