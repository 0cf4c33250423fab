//! Duplicate-war matching
//!
//! Partitions a clan's normalized records into detail and summary wars,
//! then marks every summary war that fuzzy-matches a detail war as a
//! duplicate. A match requires an identical opponent name and end times
//! strictly within 48 hours of each other. When several detail wars
//! qualify (same opponent twice inside the window, e.g. CWL rounds), the
//! one with the smallest time delta wins.

use bson::oid::ObjectId;

use super::normalize::WarKey;

/// Two records describing the same war when their end times differ by
/// strictly less than this (48 hours in milliseconds)
pub const FUZZY_TIME_TOLERANCE_MS: i64 = 48 * 60 * 60 * 1000;

/// A clan's normalized records split by variant
#[derive(Debug, Default)]
pub struct Partition {
    pub detail_wars: Vec<WarKey>,
    pub summary_wars: Vec<WarKey>,
}

/// A summary record identified as redundant, with the detail record that
/// anchors it
#[derive(Debug, Clone)]
pub struct DuplicateMatch {
    pub summary_id: ObjectId,
    pub detail_id: ObjectId,
    pub opponent_name: String,
    pub delta_ms: i64,
}

/// Single-pass split into detail and summary wars, preserving fetch order
pub fn partition(keys: Vec<WarKey>) -> Partition {
    let mut split = Partition::default();
    for key in keys {
        if key.has_details {
            split.detail_wars.push(key);
        } else {
            split.summary_wars.push(key);
        }
    }
    split
}

/// Find the detail war that best matches a summary war, if any.
///
/// Candidates must share the exact opponent name and end within the
/// fuzzy tolerance; among candidates the minimal absolute delta wins.
pub fn find_duplicate<'a>(summary: &WarKey, details: &'a [WarKey]) -> Option<&'a WarKey> {
    details
        .iter()
        .filter(|detail| detail.opponent_name == summary.opponent_name)
        .map(|detail| {
            (
                detail,
                (detail.end_time_millis - summary.end_time_millis).abs(),
            )
        })
        .filter(|(_, delta)| *delta < FUZZY_TIME_TOLERANCE_MS)
        .min_by_key(|(_, delta)| *delta)
        .map(|(detail, _)| detail)
}

/// Match every summary war against the detail wars.
///
/// Only summary records ever appear on the deletion side; detail records
/// are match anchors and are never candidates for removal. A detail war
/// may anchor more than one summary.
pub fn match_duplicates(split: &Partition) -> Vec<DuplicateMatch> {
    split
        .summary_wars
        .iter()
        .filter_map(|summary| {
            find_duplicate(summary, &split.detail_wars).map(|detail| DuplicateMatch {
                summary_id: summary.id,
                detail_id: detail.id,
                opponent_name: summary.opponent_name.clone(),
                delta_ms: (detail.end_time_millis - summary.end_time_millis).abs(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn key(opponent: &str, end_time_millis: i64, has_details: bool) -> WarKey {
        WarKey {
            id: ObjectId::new(),
            opponent_name: opponent.to_string(),
            end_time_millis,
            has_details,
        }
    }

    #[test]
    fn test_partition_splits_by_variant() {
        let split = partition(vec![
            key("Foo", 0, true),
            key("Bar", 0, false),
            key("Baz", 0, true),
        ]);
        assert_eq!(split.detail_wars.len(), 2);
        assert_eq!(split.summary_wars.len(), 1);
        assert_eq!(split.summary_wars[0].opponent_name, "Bar");
    }

    #[test]
    fn test_match_within_tolerance() {
        // 18 hours apart, same opponent
        let split = Partition {
            detail_wars: vec![key("Foo", 0, true)],
            summary_wars: vec![key("Foo", 18 * HOUR_MS, false)],
        };
        let matches = match_duplicates(&split);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].delta_ms, 18 * HOUR_MS);
    }

    #[test]
    fn test_no_match_outside_tolerance() {
        // 4.5 days apart
        let split = Partition {
            detail_wars: vec![key("Foo", 0, true)],
            summary_wars: vec![key("Foo", 108 * HOUR_MS, false)],
        };
        assert!(match_duplicates(&split).is_empty());
    }

    #[test]
    fn test_tolerance_boundary_is_strict() {
        let details = vec![key("Foo", 0, true)];

        let just_inside = key("Foo", FUZZY_TIME_TOLERANCE_MS - 1, false);
        assert!(find_duplicate(&just_inside, &details).is_some());

        let exactly_at = key("Foo", FUZZY_TIME_TOLERANCE_MS, false);
        assert!(find_duplicate(&exactly_at, &details).is_none());
    }

    #[test]
    fn test_opponent_name_is_case_sensitive() {
        let details = vec![key("Foo", 0, true)];
        let summary = key("foo", HOUR_MS, false);
        assert!(find_duplicate(&summary, &details).is_none());
    }

    #[test]
    fn test_minimal_delta_wins_among_candidates() {
        // Same opponent twice inside the window (CWL-style back-to-back)
        let near = key("Foo", 30 * HOUR_MS, true);
        let far = key("Foo", 2 * HOUR_MS, true);
        let details = vec![near.clone(), far.clone()];

        let summary = key("Foo", 28 * HOUR_MS, false);
        let matched = find_duplicate(&summary, &details).unwrap();
        assert_eq!(matched.id, near.id);
    }

    #[test]
    fn test_summary_never_anchors_summary() {
        let split = Partition {
            detail_wars: vec![],
            summary_wars: vec![key("Foo", 0, false), key("Foo", HOUR_MS, false)],
        };
        assert!(match_duplicates(&split).is_empty());
    }
}
