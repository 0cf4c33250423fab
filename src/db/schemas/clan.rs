//! Managed-clan registry document schema
//!
//! Created and updated by the clan-management flows; read-only here.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Collection name for managed clans
pub const CLAN_COLLECTION: &str = "clans";

/// Managed clan document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ClanDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// In-game clan tag (e.g. "#2PP0R9Y")
    pub tag: String,

    /// Display name
    #[serde(default)]
    pub name: String,
}
