//! Warsweep - duplicate war-history reconciler
//!
//! The platform's two war ingestion paths (detailed per-attack sync and
//! lightweight summary sync) can each record the same war, leaving a
//! redundant summary record next to a detailed one. Warsweep walks every
//! managed clan's war history, fuzzy-matches summaries against detailed
//! records (same opponent, end times within 48 hours) and deletes the
//! shadowed summaries in one batch per clan.
//!
//! The run is idempotent and deletion-only: detailed records are never
//! modified, and a rerun on clean data deletes nothing.

pub mod config;
pub mod db;
pub mod reconcile;
pub mod types;

pub use config::Args;
pub use reconcile::{run, RunOptions, RunSummary};
pub use types::{Result, SweepError};
