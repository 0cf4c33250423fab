//! Store seam for the reconciler
//!
//! The reconciler never talks to MongoDB directly; it goes through this
//! trait so tests can run against an in-memory store. The production
//! implementation lives in `db::mongo`.

use bson::oid::ObjectId;

use crate::db::schemas::{ClanDoc, RawWarDoc};
use crate::types::Result;

/// Read/delete access to the clan registry and war-history collections
#[async_trait::async_trait]
pub trait WarStore: Send + Sync {
    /// List all managed clans from the registry
    async fn list_clans(&self) -> Result<Vec<ClanDoc>>;

    /// List all war-history records belonging to one clan
    async fn list_war_history(&self, clan_tag: &str) -> Result<Vec<RawWarDoc>>;

    /// Delete the given war-history records, scoped to one clan, as a
    /// single batch. Returns the number of documents removed.
    async fn delete_war_records(&self, clan_tag: &str, ids: &[ObjectId]) -> Result<u64>;
}
