//! Snapshot record types sent to the monitoring backend.
//!
//! A `FullSnapshot` holds seven ordered sequences that cross-reference each
//! other through dense, zero-based, snapshot-local indices. An index is only
//! meaningful within the snapshot that assigned it; values from different
//! snapshots are never comparable.
//!
//! Optionality is explicit: a field that does not apply is `None`, never a
//! placeholder value. The one deliberate collapse is that an empty view or
//! constraint definition also encodes as `None`, matching the wire format
//! of the upstream backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accumulator for one snapshot build.
///
/// Exclusively owned by a single build; the transform appends to the
/// sequences and never reads data back out of them.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct FullSnapshot {
    /// One entry per relation, in registration order. The position of an
    /// entry is the relation's snapshot-local index.
    pub relation_references: Vec<RelationReference>,
    pub relation_informations: Vec<RelationInformation>,
    pub relation_statistics: Vec<RelationStatistic>,
    pub relation_events: Vec<RelationEvent>,
    /// One entry per index, in registration order. The position of an
    /// entry is the index's snapshot-local index.
    pub index_references: Vec<IndexReference>,
    pub index_informations: Vec<IndexInformation>,
    pub index_statistics: Vec<IndexStatistic>,
}

/// Lightweight identity of a relation within the snapshot.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationReference {
    /// Snapshot-local index of the owning database.
    pub database_idx: i32,
    pub schema_name: String,
    pub relation_name: String,
}

/// Partitioning strategy of a partitioned table.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum PartitionStrategy {
    Range,
    List,
    Hash,
    #[default]
    Unknown,
}

impl PartitionStrategy {
    /// Maps the single-character catalog code. Anything unrecognized,
    /// including the empty non-partitioned case, is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "r" => Self::Range,
            "l" => Self::List,
            "h" => Self::Hash,
            _ => Self::Unknown,
        }
    }
}

/// Fully resolved structural description of one relation.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationInformation {
    /// Snapshot-local index of this relation.
    pub relation_idx: i32,
    /// Relation kind code (r, v, m, p, ...).
    pub relation_type: String,
    /// Persistence kind code (p, u, t).
    pub persistence_type: String,
    pub fillfactor: i32,
    pub has_oids: bool,
    pub has_inheritance_children: bool,
    pub has_toast: bool,
    pub frozen_xid: u32,
    pub minimum_multixact_xid: u32,
    /// Snapshot-local index of the partition/inheritance parent, `None`
    /// when the relation has no parent.
    pub parent_relation_idx: Option<i32>,
    pub partition_boundary: String,
    pub partition_strategy: PartitionStrategy,
    pub partition_columns: Vec<String>,
    pub partitioned_by: String,
    pub exclusively_locked: bool,
    /// Raw storage options, e.g. `fillfactor=70`.
    pub options: Vec<String>,
    /// View definition; `None` for non-views (and for empty definitions).
    pub view_definition: Option<String>,
    pub columns: Vec<RelationColumn>,
    pub constraints: Vec<RelationConstraint>,
}

/// A column within a [`RelationInformation`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationColumn {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    /// Ordinal position, starting at 1.
    pub position: i32,
    pub default_value: Option<String>,
}

/// A constraint within a [`RelationInformation`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationConstraint {
    pub name: String,
    /// Constraint kind code (c, f, p, u, t, x).
    pub constraint_type: String,
    pub constraint_def: String,
    /// Snapshot-local index of the referenced relation for foreign keys.
    /// `None` when the constraint has no foreign target, which is distinct
    /// from referencing the relation at index 0.
    pub foreign_relation_idx: Option<i32>,
    pub foreign_update_type: String,
    pub foreign_delete_type: String,
    pub foreign_match_type: String,
    /// Ordinals of the constrained local columns.
    pub columns: Vec<i32>,
    /// Ordinals of the referenced foreign columns.
    pub foreign_columns: Vec<i32>,
}

/// Flat statistics record for one relation, present only when a delta was
/// computed for it this cycle.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationStatistic {
    /// Snapshot-local index of the relation.
    pub relation_idx: i32,
    pub size_bytes: i64,
    pub toast_size_bytes: i64,
    pub seq_scan: i64,
    pub seq_tup_read: i64,
    pub idx_scan: i64,
    pub idx_tup_fetch: i64,
    pub n_tup_ins: i64,
    pub n_tup_upd: i64,
    pub n_tup_del: i64,
    pub n_tup_hot_upd: i64,
    pub n_live_tup: i64,
    pub n_dead_tup: i64,
    /// Rows modified since the last analyze; 0 when the server does not
    /// track it.
    pub n_mod_since_analyze: i64,
    pub heap_blks_read: i64,
    pub heap_blks_hit: i64,
    pub idx_blks_read: i64,
    pub idx_blks_hit: i64,
    pub toast_blks_read: i64,
    pub toast_blks_hit: i64,
    pub tidx_blks_read: i64,
    pub tidx_blks_hit: i64,
}

/// Kind of maintenance event reconstructed from the statistics delta.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum RelationEventType {
    ManualAnalyze,
    AutoAnalyze,
    ManualVacuum,
    AutoVacuum,
}

/// A discrete maintenance event synthesized from an aggregate counter.
///
/// The source only exposes a rolling count and the most recent occurrence
/// time, so all events of one (relation, kind) pair share that timestamp;
/// only the most recent one is exact.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RelationEvent {
    /// Snapshot-local index of the relation.
    pub relation_idx: i32,
    pub event_type: RelationEventType,
    pub occurred_at: DateTime<Utc>,
    /// True for all but the most recent occurrence, whose true time is
    /// unrecoverable from the aggregate counter.
    pub approximate_occurred_at: bool,
}

/// Lightweight identity of an index within the snapshot.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct IndexReference {
    /// Snapshot-local index of the owning database.
    pub database_idx: i32,
    pub schema_name: String,
    pub index_name: String,
}

/// Fully resolved structural description of one index.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct IndexInformation {
    /// Snapshot-local index of this index.
    pub index_idx: i32,
    /// Snapshot-local index of the owning relation.
    pub relation_idx: i32,
    /// Access method name (btree, hash, gin, ...).
    pub index_type: String,
    pub index_def: String,
    pub is_primary: bool,
    pub is_unique: bool,
    pub is_valid: bool,
    pub fillfactor: i32,
    /// Definition of the backing constraint; `None` when the index backs
    /// no constraint (and for empty definitions).
    pub constraint_def: Option<String>,
    /// Ordinals of the indexed columns, 0 for expression members.
    pub columns: Vec<i32>,
}

/// Flat statistics record for one index, present only when a delta was
/// computed for it this cycle.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct IndexStatistic {
    /// Snapshot-local index of the index.
    pub index_idx: i32,
    pub size_bytes: i64,
    pub idx_scan: i64,
    pub idx_tup_read: i64,
    pub idx_tup_fetch: i64,
    pub idx_blks_read: i64,
    pub idx_blks_hit: i64,
}
