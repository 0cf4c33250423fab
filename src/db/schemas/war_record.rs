//! War-history document schema
//!
//! Two ingestion paths write into `war_history` and their shapes differ:
//! the detailed sync stores a nested `opponent` object plus per-member
//! attack breakdowns, the summary sync stores a flat `opponent_name` and
//! no member data. Both carry a CoC-formatted or ISO-8601 `end_time`
//! string. Everything is optional here; `reconcile::normalize` performs
//! the one controlled cast from this duck-typed shape into a tagged key.

use bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Collection name for war-history records
pub const WAR_HISTORY_COLLECTION: &str = "war_history";

/// Raw war-history document as stored, union of both ingestion shapes
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RawWarDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Owning clan's tag
    pub clan_id: String,

    /// Nested opponent object (detailed sync)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<OpponentRef>,

    /// Flat opponent name (summary sync)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_name: Option<String>,

    /// War end time, CoC compact ("20240101T120000.000Z") or ISO-8601
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Outcome ("win", "lose", "tie")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Per-member breakdown, present only on detailed records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<WarMemberDoc>>,

    /// Fields the syncs store that this tool does not interpret
    #[serde(flatten)]
    pub extra: Document,
}

/// Opponent identity as stored by the detailed sync
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OpponentRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One member's attacks within a detailed war record
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WarMemberDoc {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub attacks: Vec<AttackDoc>,
}

/// A single attack in a detailed war record
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct AttackDoc {
    #[serde(default)]
    pub defender_tag: String,

    #[serde(default)]
    pub stars: i32,

    #[serde(default)]
    pub destruction_percentage: f64,
}
