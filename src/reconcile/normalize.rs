//! Record normalization
//!
//! Converts a raw stored war document into a canonical `WarKey` used for
//! duplicate matching. Normalization is total and never errors: a record
//! with a missing opponent or an unparseable end time still produces a
//! key (empty name, zero timestamp) but carries a `ParseIssue`, which the
//! pipeline uses to keep it out of both match partitions. Such a record
//! is neither deleted nor used as a match anchor.

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDateTime};

use crate::db::schemas::RawWarDoc;

/// CoC's compact war end-time format, e.g. "20240101T120000.000Z"
const COC_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// Canonical matching key derived from one stored war record
#[derive(Debug, Clone, PartialEq)]
pub struct WarKey {
    /// Source document, kept for deletion
    pub id: ObjectId,
    /// Opponent clan name, compared exactly (case-sensitive)
    pub opponent_name: String,
    /// War end time as milliseconds since epoch, UTC
    pub end_time_millis: i64,
    /// Whether the record carries per-member attack data
    pub has_details: bool,
}

/// Why a record could not be fully normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// Neither `opponent.name` nor `opponent_name` present
    MissingOpponent,
    /// No `end_time` field at all
    MissingEndTime,
    /// `end_time` present but not CoC-compact or ISO-8601
    BadEndTime(String),
}

impl std::fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseIssue::MissingOpponent => write!(f, "missing opponent name"),
            ParseIssue::MissingEndTime => write!(f, "missing end time"),
            ParseIssue::BadEndTime(raw) => write!(f, "unparseable end time '{}'", raw),
        }
    }
}

/// One normalized record: always a key, plus the issue that disqualifies
/// it from matching when one was found
#[derive(Debug, Clone)]
pub struct NormalizedWar {
    pub key: WarKey,
    pub issue: Option<ParseIssue>,
}

/// Parse a war end time into epoch milliseconds (UTC).
///
/// Accepts CoC's compact form ("20240101T120000.000Z") and ISO-8601 /
/// RFC 3339 ("2024-01-01T12:00:00Z", with or without offset).
pub fn parse_war_end_time(raw: &str) -> Option<i64> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, COC_TIME_FORMAT) {
        return Some(naive.and_utc().timestamp_millis());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }

    None
}

/// Normalize one raw war-history document into a `WarKey`.
///
/// Pure, no I/O, total over both ingestion shapes. The detailed sync
/// stores the opponent nested, the summary sync stores it flat; the
/// nested form wins when both are present. A record counts as detailed
/// when it has at least one member entry.
pub fn war_key(id: ObjectId, doc: &RawWarDoc) -> NormalizedWar {
    let opponent_name = doc
        .opponent
        .as_ref()
        .and_then(|o| o.name.as_deref())
        .or(doc.opponent_name.as_deref())
        .unwrap_or_default()
        .to_string();

    let has_details = doc.members.as_ref().is_some_and(|m| !m.is_empty());

    let mut issue = None;
    if opponent_name.is_empty() {
        issue = Some(ParseIssue::MissingOpponent);
    }

    let end_time_millis = match doc.end_time.as_deref() {
        Some(raw) => match parse_war_end_time(raw) {
            Some(millis) => millis,
            None => {
                issue.get_or_insert(ParseIssue::BadEndTime(raw.to_string()));
                0
            }
        },
        None => {
            issue.get_or_insert(ParseIssue::MissingEndTime);
            0
        }
    };

    NormalizedWar {
        key: WarKey {
            id,
            opponent_name,
            end_time_millis,
            has_details,
        },
        issue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::{OpponentRef, WarMemberDoc};

    fn raw_doc() -> RawWarDoc {
        RawWarDoc {
            clan_id: "#2PP0R9Y".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_coc_compact_time() {
        let millis = parse_war_end_time("20240101T120000.000Z").unwrap();
        // 2024-01-01 12:00:00 UTC
        assert_eq!(millis, 1_704_110_400_000);
    }

    #[test]
    fn test_parse_iso8601_time() {
        let compact = parse_war_end_time("20240101T120000.000Z").unwrap();
        let iso = parse_war_end_time("2024-01-01T12:00:00Z").unwrap();
        let offset = parse_war_end_time("2024-01-01T14:00:00+02:00").unwrap();
        assert_eq!(compact, iso);
        assert_eq!(compact, offset);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_war_end_time("yesterday").is_none());
        assert!(parse_war_end_time("").is_none());
        assert!(parse_war_end_time("20240101").is_none());
    }

    #[test]
    fn test_war_key_detailed_record() {
        let mut doc = raw_doc();
        doc.opponent = Some(OpponentRef {
            name: Some("Foo".to_string()),
            tag: Some("#FOO".to_string()),
        });
        doc.end_time = Some("20240101T120000.000Z".to_string());
        doc.members = Some(vec![WarMemberDoc::default()]);

        let normalized = war_key(ObjectId::new(), &doc);
        assert!(normalized.issue.is_none());
        assert_eq!(normalized.key.opponent_name, "Foo");
        assert!(normalized.key.has_details);
        assert_eq!(normalized.key.end_time_millis, 1_704_110_400_000);
    }

    #[test]
    fn test_war_key_summary_record_flat_opponent() {
        let mut doc = raw_doc();
        doc.opponent_name = Some("Bar".to_string());
        doc.end_time = Some("2024-01-01T12:00:00Z".to_string());

        let normalized = war_key(ObjectId::new(), &doc);
        assert!(normalized.issue.is_none());
        assert_eq!(normalized.key.opponent_name, "Bar");
        assert!(!normalized.key.has_details);
    }

    #[test]
    fn test_war_key_nested_opponent_wins_over_flat() {
        let mut doc = raw_doc();
        doc.opponent = Some(OpponentRef {
            name: Some("Nested".to_string()),
            tag: None,
        });
        doc.opponent_name = Some("Flat".to_string());
        doc.end_time = Some("2024-01-01T12:00:00Z".to_string());

        let normalized = war_key(ObjectId::new(), &doc);
        assert_eq!(normalized.key.opponent_name, "Nested");
    }

    #[test]
    fn test_war_key_missing_opponent_is_issue_not_panic() {
        let mut doc = raw_doc();
        doc.end_time = Some("2024-01-01T12:00:00Z".to_string());

        let normalized = war_key(ObjectId::new(), &doc);
        assert_eq!(normalized.issue, Some(ParseIssue::MissingOpponent));
        assert_eq!(normalized.key.opponent_name, "");
    }

    #[test]
    fn test_war_key_bad_end_time_is_issue() {
        let mut doc = raw_doc();
        doc.opponent_name = Some("Foo".to_string());
        doc.end_time = Some("not-a-time".to_string());

        let normalized = war_key(ObjectId::new(), &doc);
        assert_eq!(
            normalized.issue,
            Some(ParseIssue::BadEndTime("not-a-time".to_string()))
        );
        assert_eq!(normalized.key.end_time_millis, 0);
    }

    #[test]
    fn test_war_key_empty_members_is_summary() {
        let mut doc = raw_doc();
        doc.opponent_name = Some("Foo".to_string());
        doc.end_time = Some("2024-01-01T12:00:00Z".to_string());
        doc.members = Some(vec![]);

        let normalized = war_key(ObjectId::new(), &doc);
        assert!(!normalized.key.has_details);
    }
}
