//! War-history reconciliation
//!
//! ## Overview
//!
//! Two ingestion paths write war records: the detailed per-attack sync
//! and the lightweight summary sync. When both see the same war, the
//! store ends up with a detailed record and a redundant summary record.
//! This module repairs that, one clan at a time:
//!
//! ```text
//! Fetching -> Normalizing -> Partitioning -> Matching -> Deleting -> Done
//! ```
//!
//! Failure isolation is per clan: a clan whose fetch or batch delete
//! fails is logged and skipped, the run continues with the next clan.
//! Per-record parse issues only exclude that record from matching. The
//! whole run is idempotent - deletions are the only write, and a rerun
//! on clean data deletes nothing.

pub mod matching;
pub mod normalize;
pub mod store;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::schemas::ClanDoc;
use crate::types::Result;

use self::matching::{match_duplicates, partition};
use self::normalize::war_key;
use self::store::WarStore;

/// Options controlling one reconciliation run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Report matches without deleting
    pub dry_run: bool,
    /// Restrict the run to one clan tag
    pub clan_tag: Option<String>,
}

/// Per-clan counters for one pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClanStats {
    pub clan_tag: String,
    pub records: usize,
    pub detail_wars: usize,
    pub summary_wars: usize,
    pub parse_issues: usize,
    pub duplicates_found: usize,
    pub duplicates_removed: u64,
}

/// Aggregated outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub clans_processed: usize,
    pub clans_failed: usize,
    pub records_scanned: usize,
    pub parse_issues: usize,
    pub duplicates_found: usize,
    pub duplicates_removed: u64,
}

impl RunSummary {
    fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            dry_run,
            clans_processed: 0,
            clans_failed: 0,
            records_scanned: 0,
            parse_issues: 0,
            duplicates_found: 0,
            duplicates_removed: 0,
        }
    }

    /// True when every clan completed. Parse issues do not count:
    /// exit status only reflects clan-level failures.
    pub fn is_clean(&self) -> bool {
        self.clans_failed == 0
    }
}

/// Reconcile every managed clan's war history.
///
/// The clan registry failing to load is fatal (nothing to iterate);
/// everything after that is isolated per clan.
pub async fn run(store: &dyn WarStore, opts: &RunOptions) -> Result<RunSummary> {
    let mut clans = store.list_clans().await?;

    if let Some(ref tag) = opts.clan_tag {
        clans.retain(|clan| &clan.tag == tag);
        if clans.is_empty() {
            warn!(clan = %tag, "No managed clan with that tag, nothing to do");
        }
    }

    let mut summary = RunSummary::new(opts.dry_run);
    info!(
        run_id = %summary.run_id,
        clans = clans.len(),
        dry_run = opts.dry_run,
        "Starting war-history reconciliation"
    );

    for clan in &clans {
        match reconcile_clan(store, clan, opts.dry_run).await {
            Ok(stats) => {
                summary.clans_processed += 1;
                summary.records_scanned += stats.records;
                summary.parse_issues += stats.parse_issues;
                summary.duplicates_found += stats.duplicates_found;
                summary.duplicates_removed += stats.duplicates_removed;
            }
            Err(e) => {
                summary.clans_failed += 1;
                warn!(clan = %clan.tag, error = %e, "Clan skipped");
            }
        }
    }

    info!(
        run_id = %summary.run_id,
        clans_processed = summary.clans_processed,
        clans_failed = summary.clans_failed,
        records_scanned = summary.records_scanned,
        parse_issues = summary.parse_issues,
        duplicates_found = summary.duplicates_found,
        duplicates_removed = summary.duplicates_removed,
        "Reconciliation run finished"
    );

    Ok(summary)
}

/// One clan's full pass: fetch, normalize, partition, match, delete.
async fn reconcile_clan(
    store: &dyn WarStore,
    clan: &ClanDoc,
    dry_run: bool,
) -> Result<ClanStats> {
    let docs = store.list_war_history(&clan.tag).await?;

    let mut stats = ClanStats {
        clan_tag: clan.tag.clone(),
        records: docs.len(),
        ..Default::default()
    };

    // Normalizing: records with a parse issue are counted but excluded
    // from both partitions, so they are neither deleted nor anchors.
    let mut keys = Vec::with_capacity(docs.len());
    for doc in &docs {
        let Some(id) = doc._id else {
            stats.parse_issues += 1;
            debug!(clan = %clan.tag, "War record without _id, skipped");
            continue;
        };
        let normalized = war_key(id, doc);
        match normalized.issue {
            Some(issue) => {
                stats.parse_issues += 1;
                debug!(clan = %clan.tag, record = %id, issue = %issue, "War record excluded from matching");
            }
            None => keys.push(normalized.key),
        }
    }

    let split = partition(keys);
    stats.detail_wars = split.detail_wars.len();
    stats.summary_wars = split.summary_wars.len();

    let matches = match_duplicates(&split);
    stats.duplicates_found = matches.len();

    if matches.is_empty() {
        debug!(clan = %clan.tag, records = stats.records, "No duplicate summaries");
        return Ok(stats);
    }

    for dup in &matches {
        debug!(
            clan = %clan.tag,
            summary = %dup.summary_id,
            detail = %dup.detail_id,
            opponent = %dup.opponent_name,
            delta_ms = dup.delta_ms,
            "Summary shadowed by detail record"
        );
    }

    if dry_run {
        info!(
            clan = %clan.tag,
            duplicates = matches.len(),
            "Dry run: duplicates found, nothing deleted"
        );
        return Ok(stats);
    }

    let ids: Vec<_> = matches.iter().map(|dup| dup.summary_id).collect();
    stats.duplicates_removed = store.delete_war_records(&clan.tag, &ids).await?;

    info!(
        clan = %clan.tag,
        found = stats.duplicates_found,
        removed = stats.duplicates_removed,
        "Duplicate summaries removed"
    );

    Ok(stats)
}
