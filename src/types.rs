//! Error taxonomy and result alias for warsweep
//!
//! Errors are clan-granular: `Fetch` and `Deletion` abort one clan's pass
//! and are counted against the run's exit status, `Config` and `Database`
//! abort the run before any clan is touched. Per-record parse issues are
//! not errors (see `reconcile::normalize::ParseIssue`); they only show up
//! in run statistics.

use thiserror::Error;

/// Errors surfaced by the reconciler
#[derive(Debug, Error)]
pub enum SweepError {
    /// Required configuration missing or malformed at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection or infrastructure failure
    #[error("Database error: {0}")]
    Database(String),

    /// A clan's registry or war-history collection could not be read
    #[error("Fetch failed for clan {clan}: {reason}")]
    Fetch { clan: String, reason: String },

    /// The batch delete for a clan's matched summaries failed
    #[error("Deletion failed for clan {clan}: {reason}")]
    Deletion { clan: String, reason: String },
}

impl SweepError {
    /// Clan-scoped fetch failure
    pub fn fetch(clan: &str, reason: impl std::fmt::Display) -> Self {
        SweepError::Fetch {
            clan: clan.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Clan-scoped batch-delete failure
    pub fn deletion(clan: &str, reason: impl std::fmt::Display) -> Self {
        SweepError::Deletion {
            clan: clan.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SweepError>;
