//! Database schemas for warsweep
//!
//! Defines MongoDB document structures for the clan registry and the
//! war-history collection both ingestion syncs write into.

mod clan;
mod war_record;

pub use clan::{ClanDoc, CLAN_COLLECTION};
pub use war_record::{AttackDoc, OpponentRef, RawWarDoc, WarMemberDoc, WAR_HISTORY_COLLECTION};
