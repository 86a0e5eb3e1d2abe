//! Statistics deltas between two collection cycles.
//!
//! Cumulative counters (scans, tuple operations, block I/O, maintenance
//! counts) are stored as the difference since the previous cycle; gauges
//! (sizes, live/dead tuple estimates, last-occurrence timestamps) are the
//! current value. An object with no entry in the previous cycle, or whose
//! counters regressed (statistics reset), gets no delta entry at all — the
//! encoder treats that as "no statistics this cycle", not as an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::relation::Oid;

/// All statistics deltas for one collection cycle, keyed by database OID.
///
/// A database can be missing entirely (e.g. the per-database connection
/// failed this cycle); every object in it then simply has no statistics.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DiffState {
    pub schema_stats: HashMap<Oid, SchemaStats>,
}

/// Per-database statistics deltas, keyed by object OID.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SchemaStats {
    pub relation_stats: HashMap<Oid, RelationStats>,
    pub index_stats: HashMap<Oid, IndexStats>,
}

/// Statistics for one relation: counter deltas plus point-in-time gauges.
///
/// Counter fields mirror `pg_stat_user_tables` / `pg_statio_user_tables`;
/// the same struct shape holds both a raw cumulative sample and a computed
/// delta, so [`diff_relation_stats`] maps the type onto itself.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationStats {
    /// Table size in bytes (gauge).
    /// Source: `pg_table_size(relid)`
    pub size_bytes: i64,

    /// TOAST table size in bytes (gauge).
    /// Source: `pg_total_relation_size(reltoastrelid)`
    pub toast_size_bytes: i64,

    /// Sequential scans initiated.
    /// Source: `pg_stat_user_tables.seq_scan`
    pub seq_scan: i64,

    /// Rows returned by sequential scans.
    /// Source: `pg_stat_user_tables.seq_tup_read`
    pub seq_tup_read: i64,

    /// Index scans initiated.
    /// Source: `pg_stat_user_tables.idx_scan`
    pub idx_scan: i64,

    /// Rows fetched by index scans.
    /// Source: `pg_stat_user_tables.idx_tup_fetch`
    pub idx_tup_fetch: i64,

    /// Rows inserted.
    /// Source: `pg_stat_user_tables.n_tup_ins`
    pub n_tup_ins: i64,

    /// Rows updated.
    /// Source: `pg_stat_user_tables.n_tup_upd`
    pub n_tup_upd: i64,

    /// Rows deleted.
    /// Source: `pg_stat_user_tables.n_tup_del`
    pub n_tup_del: i64,

    /// Rows HOT-updated.
    /// Source: `pg_stat_user_tables.n_tup_hot_upd`
    pub n_tup_hot_upd: i64,

    /// Estimated live rows (gauge).
    /// Source: `pg_stat_user_tables.n_live_tup`
    pub n_live_tup: i64,

    /// Estimated dead rows (gauge).
    /// Source: `pg_stat_user_tables.n_dead_tup`
    pub n_dead_tup: i64,

    /// Rows modified since the last analyze (gauge). `None` on servers that
    /// do not track it.
    /// Source: `pg_stat_user_tables.n_mod_since_analyze`
    pub n_mod_since_analyze: Option<i64>,

    /// Heap blocks read from disk.
    /// Source: `pg_statio_user_tables.heap_blks_read`
    pub heap_blks_read: i64,

    /// Heap blocks found in buffer cache.
    /// Source: `pg_statio_user_tables.heap_blks_hit`
    pub heap_blks_hit: i64,

    /// Index blocks read from disk.
    /// Source: `pg_statio_user_tables.idx_blks_read`
    pub idx_blks_read: i64,

    /// Index blocks found in buffer cache.
    /// Source: `pg_statio_user_tables.idx_blks_hit`
    pub idx_blks_hit: i64,

    /// TOAST blocks read from disk.
    /// Source: `pg_statio_user_tables.toast_blks_read`
    pub toast_blks_read: i64,

    /// TOAST blocks found in buffer cache.
    /// Source: `pg_statio_user_tables.toast_blks_hit`
    pub toast_blks_hit: i64,

    /// TOAST index blocks read from disk.
    /// Source: `pg_statio_user_tables.tidx_blks_read`
    pub tidx_blks_read: i64,

    /// TOAST index blocks found in buffer cache.
    /// Source: `pg_statio_user_tables.tidx_blks_hit`
    pub tidx_blks_hit: i64,

    /// Manual analyze runs.
    /// Source: `pg_stat_user_tables.analyze_count`
    pub analyze_count: i64,

    /// Autoanalyze runs.
    /// Source: `pg_stat_user_tables.autoanalyze_count`
    pub autoanalyze_count: i64,

    /// Manual vacuum runs.
    /// Source: `pg_stat_user_tables.vacuum_count`
    pub vacuum_count: i64,

    /// Autovacuum runs.
    /// Source: `pg_stat_user_tables.autovacuum_count`
    pub autovacuum_count: i64,

    /// Last manual analyze time (epoch secs, 0 = never).
    /// Source: `pg_stat_user_tables.last_analyze`
    pub last_analyze: i64,

    /// Last autoanalyze time (epoch secs, 0 = never).
    /// Source: `pg_stat_user_tables.last_autoanalyze`
    pub last_autoanalyze: i64,

    /// Last manual vacuum time (epoch secs, 0 = never).
    /// Source: `pg_stat_user_tables.last_vacuum`
    pub last_vacuum: i64,

    /// Last autovacuum time (epoch secs, 0 = never).
    /// Source: `pg_stat_user_tables.last_autovacuum`
    pub last_autovacuum: i64,
}

/// Statistics for one index: counter deltas plus the current size.
///
/// Counter fields mirror `pg_stat_user_indexes` / `pg_statio_user_indexes`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct IndexStats {
    /// Index size in bytes (gauge).
    /// Source: `pg_relation_size(indexrelid)`
    pub size_bytes: i64,

    /// Index scans initiated.
    /// Source: `pg_stat_user_indexes.idx_scan`
    pub idx_scan: i64,

    /// Index entries returned.
    /// Source: `pg_stat_user_indexes.idx_tup_read`
    pub idx_tup_read: i64,

    /// Live table rows fetched by index scans.
    /// Source: `pg_stat_user_indexes.idx_tup_fetch`
    pub idx_tup_fetch: i64,

    /// Index blocks read from disk.
    /// Source: `pg_statio_user_indexes.idx_blks_read`
    pub idx_blks_read: i64,

    /// Index blocks found in buffer cache.
    /// Source: `pg_statio_user_indexes.idx_blks_hit`
    pub idx_blks_hit: i64,
}

/// Compute i64 delta, returning `None` on counter regression (stats reset).
pub fn di64(curr: i64, prev: i64) -> Option<i64> {
    (curr >= prev).then_some(curr - prev)
}

/// Diff one relation's cumulative sample against the previous cycle.
///
/// Returns `None` when any counter regressed; the object is then treated
/// like a freshly created one and contributes no statistics this cycle.
pub fn diff_relation_stats(curr: &RelationStats, prev: &RelationStats) -> Option<RelationStats> {
    Some(RelationStats {
        // Gauges: current value
        size_bytes: curr.size_bytes,
        toast_size_bytes: curr.toast_size_bytes,
        n_live_tup: curr.n_live_tup,
        n_dead_tup: curr.n_dead_tup,
        n_mod_since_analyze: curr.n_mod_since_analyze,
        last_analyze: curr.last_analyze,
        last_autoanalyze: curr.last_autoanalyze,
        last_vacuum: curr.last_vacuum,
        last_autovacuum: curr.last_autovacuum,
        // Cumulative counters: delta since previous cycle
        seq_scan: di64(curr.seq_scan, prev.seq_scan)?,
        seq_tup_read: di64(curr.seq_tup_read, prev.seq_tup_read)?,
        idx_scan: di64(curr.idx_scan, prev.idx_scan)?,
        idx_tup_fetch: di64(curr.idx_tup_fetch, prev.idx_tup_fetch)?,
        n_tup_ins: di64(curr.n_tup_ins, prev.n_tup_ins)?,
        n_tup_upd: di64(curr.n_tup_upd, prev.n_tup_upd)?,
        n_tup_del: di64(curr.n_tup_del, prev.n_tup_del)?,
        n_tup_hot_upd: di64(curr.n_tup_hot_upd, prev.n_tup_hot_upd)?,
        heap_blks_read: di64(curr.heap_blks_read, prev.heap_blks_read)?,
        heap_blks_hit: di64(curr.heap_blks_hit, prev.heap_blks_hit)?,
        idx_blks_read: di64(curr.idx_blks_read, prev.idx_blks_read)?,
        idx_blks_hit: di64(curr.idx_blks_hit, prev.idx_blks_hit)?,
        toast_blks_read: di64(curr.toast_blks_read, prev.toast_blks_read)?,
        toast_blks_hit: di64(curr.toast_blks_hit, prev.toast_blks_hit)?,
        tidx_blks_read: di64(curr.tidx_blks_read, prev.tidx_blks_read)?,
        tidx_blks_hit: di64(curr.tidx_blks_hit, prev.tidx_blks_hit)?,
        analyze_count: di64(curr.analyze_count, prev.analyze_count)?,
        autoanalyze_count: di64(curr.autoanalyze_count, prev.autoanalyze_count)?,
        vacuum_count: di64(curr.vacuum_count, prev.vacuum_count)?,
        autovacuum_count: di64(curr.autovacuum_count, prev.autovacuum_count)?,
    })
}

/// Diff one index's cumulative sample against the previous cycle.
pub fn diff_index_stats(curr: &IndexStats, prev: &IndexStats) -> Option<IndexStats> {
    Some(IndexStats {
        size_bytes: curr.size_bytes,
        idx_scan: di64(curr.idx_scan, prev.idx_scan)?,
        idx_tup_read: di64(curr.idx_tup_read, prev.idx_tup_read)?,
        idx_tup_fetch: di64(curr.idx_tup_fetch, prev.idx_tup_fetch)?,
        idx_blks_read: di64(curr.idx_blks_read, prev.idx_blks_read)?,
        idx_blks_hit: di64(curr.idx_blks_hit, prev.idx_blks_hit)?,
    })
}

/// Diff a whole database's cumulative samples against the previous cycle.
///
/// Objects absent from the previous cycle produce no entry.
pub fn diff_schema_stats(curr: &SchemaStats, prev: &SchemaStats) -> SchemaStats {
    let relation_stats = curr
        .relation_stats
        .iter()
        .filter_map(|(oid, stats)| {
            let prev_stats = prev.relation_stats.get(oid)?;
            Some((*oid, diff_relation_stats(stats, prev_stats)?))
        })
        .collect();

    let index_stats = curr
        .index_stats
        .iter()
        .filter_map(|(oid, stats)| {
            let prev_stats = prev.index_stats.get(oid)?;
            Some((*oid, diff_index_stats(stats, prev_stats)?))
        })
        .collect();

    SchemaStats {
        relation_stats,
        index_stats,
    }
}
