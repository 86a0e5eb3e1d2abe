//! Two-pass encoder for relation and index snapshot records.
//!
//! Pass one walks every captured relation, appends its reference record and
//! registers its identity in a fresh [`OidIndexMap`]. Only once that pass
//! has completed for all relations does pass two run: relations may name a
//! partition parent or foreign-key target that appears later in the input,
//! and those links can only resolve after every relation has an index.
//!
//! Pass two emits the fully resolved information record per relation, the
//! statistics record when the delta contains one, the synthesized
//! maintenance events, and the nested index records. Indexes cannot
//! reference each other, so a single pass inside the owning relation
//! suffices for them.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use tracing::{debug, warn};

use super::oid_index::OidIndexMap;
use crate::output::snapshot::{
    FullSnapshot, IndexInformation, IndexReference, IndexStatistic, PartitionStrategy,
    RelationColumn, RelationConstraint, RelationEvent, RelationEventType, RelationInformation,
    RelationReference, RelationStatistic,
};
use crate::state::diff::{DiffState, IndexStats, RelationStats, SchemaStats};
use crate::state::relation::{
    Oid, PostgresColumn, PostgresConstraint, PostgresIndex, PostgresRelation,
};

/// Snapshot-local index of each monitored database, produced by the
/// database encoding step that runs before relation encoding.
pub type DatabaseOidToIdx = HashMap<Oid, i32>;

/// Encodes all captured relations (and their indexes) into `snapshot`.
///
/// Appends to the seven relation/index sequences of the accumulator, which
/// must be exclusively owned by this build. Encoding is pure and
/// deterministic: the same inputs produce byte-for-byte identical output.
/// Objects that cannot be fully encoded are skipped with a warning rather
/// than failing the snapshot build.
pub fn transform_postgres_relations(
    snapshot: &mut FullSnapshot,
    relations: &[PostgresRelation],
    diff: &DiffState,
    database_oid_to_idx: &DatabaseOidToIdx,
) {
    let mut relation_oid_to_idx = OidIndexMap::new();

    // Pass one: reference records and dense index assignment, for every
    // relation, before any cross-reference resolution.
    for relation in relations {
        let idx = relation_oid_to_idx.register(relation.database_oid, relation.oid);
        debug_assert_eq!(idx as usize, snapshot.relation_references.len());
        snapshot.relation_references.push(RelationReference {
            database_idx: database_idx_for(database_oid_to_idx, relation.database_oid),
            schema_name: relation.schema_name.clone(),
            relation_name: relation.relation_name.clone(),
        });
    }

    // Pass two: resolved information, statistics, events, nested indexes.
    for relation in relations {
        let Some(relation_idx) = relation_oid_to_idx.resolve(relation.database_oid, relation.oid)
        else {
            warn!(
                oid = relation.oid,
                relation = %relation.relation_name,
                "relation missing from reference pass, skipping"
            );
            continue;
        };

        let parent_relation_idx = if relation.parent_table_oid != 0 {
            let parent =
                relation_oid_to_idx.resolve(relation.database_oid, relation.parent_table_oid);
            if parent.is_none() {
                debug!(
                    oid = relation.oid,
                    parent_oid = relation.parent_table_oid,
                    "parent relation not captured this cycle"
                );
            }
            parent
        } else {
            None
        };

        snapshot.relation_informations.push(RelationInformation {
            relation_idx,
            relation_type: relation.relation_type.clone(),
            persistence_type: relation.persistence_type.clone(),
            fillfactor: relation.fillfactor(),
            has_oids: relation.has_oids,
            has_inheritance_children: relation.has_inheritance_children,
            has_toast: relation.has_toast,
            frozen_xid: relation.frozen_xid,
            minimum_multixact_xid: relation.minimum_multixact_xid,
            parent_relation_idx,
            partition_boundary: relation.partition_boundary.clone(),
            partition_strategy: PartitionStrategy::from_code(&relation.partition_strategy),
            partition_columns: relation.partition_columns.clone(),
            partitioned_by: relation.partitioned_by.clone(),
            exclusively_locked: relation.exclusively_locked,
            options: relation.options.clone(),
            view_definition: non_empty(&relation.view_definition),
            columns: relation.columns.iter().map(encode_column).collect(),
            constraints: relation
                .constraints
                .iter()
                .map(|c| encode_constraint(relation.database_oid, c, &relation_oid_to_idx))
                .collect(),
        });

        let schema_stats = diff.schema_stats.get(&relation.database_oid);

        if let Some(stats) = schema_stats.and_then(|s| s.relation_stats.get(&relation.oid)) {
            snapshot
                .relation_statistics
                .push(encode_relation_statistic(relation_idx, stats));
            add_relation_events(
                snapshot,
                relation_idx,
                stats.analyze_count,
                stats.last_analyze,
                RelationEventType::ManualAnalyze,
            );
            add_relation_events(
                snapshot,
                relation_idx,
                stats.autoanalyze_count,
                stats.last_autoanalyze,
                RelationEventType::AutoAnalyze,
            );
            add_relation_events(
                snapshot,
                relation_idx,
                stats.vacuum_count,
                stats.last_vacuum,
                RelationEventType::ManualVacuum,
            );
            add_relation_events(
                snapshot,
                relation_idx,
                stats.autovacuum_count,
                stats.last_autovacuum,
                RelationEventType::AutoVacuum,
            );
        }

        for index in &relation.indices {
            encode_index(snapshot, relation, relation_idx, index, schema_stats, database_oid_to_idx);
        }
    }
}

/// Encodes one index: reference, information, and (when a delta exists)
/// statistics. Indexes have no forward references, so registration and
/// resolution happen in the same step.
fn encode_index(
    snapshot: &mut FullSnapshot,
    relation: &PostgresRelation,
    relation_idx: i32,
    index: &PostgresIndex,
    schema_stats: Option<&SchemaStats>,
    database_oid_to_idx: &DatabaseOidToIdx,
) {
    let index_idx = snapshot.index_references.len() as i32;
    snapshot.index_references.push(IndexReference {
        database_idx: database_idx_for(database_oid_to_idx, relation.database_oid),
        schema_name: relation.schema_name.clone(),
        index_name: index.name.clone(),
    });

    snapshot.index_informations.push(IndexInformation {
        index_idx,
        relation_idx,
        index_type: index.index_type.clone(),
        index_def: index.index_def.clone(),
        is_primary: index.is_primary,
        is_unique: index.is_unique,
        is_valid: index.is_valid,
        fillfactor: index.fillfactor(),
        constraint_def: index
            .constraint_def
            .as_deref()
            .and_then(non_empty),
        columns: index.columns.clone(),
    });

    if let Some(stats) = schema_stats.and_then(|s| s.index_stats.get(&index.index_oid)) {
        snapshot
            .index_statistics
            .push(encode_index_statistic(index_idx, stats));
    }
}

fn encode_column(column: &PostgresColumn) -> RelationColumn {
    RelationColumn {
        name: column.name.clone(),
        data_type: column.data_type.clone(),
        not_null: column.not_null,
        position: column.position,
        default_value: column.default_value.clone(),
    }
}

fn encode_constraint(
    database_oid: Oid,
    constraint: &PostgresConstraint,
    relation_oid_to_idx: &OidIndexMap,
) -> RelationConstraint {
    let foreign_relation_idx = if constraint.foreign_oid != 0 {
        let target = relation_oid_to_idx.resolve(database_oid, constraint.foreign_oid);
        if target.is_none() {
            debug!(
                constraint = %constraint.name,
                foreign_oid = constraint.foreign_oid,
                "foreign-key target not captured this cycle"
            );
        }
        target
    } else {
        None
    };

    RelationConstraint {
        name: constraint.name.clone(),
        constraint_type: constraint.constraint_type.clone(),
        constraint_def: constraint.constraint_def.clone(),
        foreign_relation_idx,
        foreign_update_type: constraint.foreign_update_type.clone(),
        foreign_delete_type: constraint.foreign_delete_type.clone(),
        foreign_match_type: constraint.foreign_match_type.clone(),
        columns: constraint.columns.clone(),
        foreign_columns: constraint.foreign_columns.clone(),
    }
}

fn encode_relation_statistic(relation_idx: i32, stats: &RelationStats) -> RelationStatistic {
    RelationStatistic {
        relation_idx,
        size_bytes: stats.size_bytes,
        toast_size_bytes: stats.toast_size_bytes,
        seq_scan: stats.seq_scan,
        seq_tup_read: stats.seq_tup_read,
        idx_scan: stats.idx_scan,
        idx_tup_fetch: stats.idx_tup_fetch,
        n_tup_ins: stats.n_tup_ins,
        n_tup_upd: stats.n_tup_upd,
        n_tup_del: stats.n_tup_del,
        n_tup_hot_upd: stats.n_tup_hot_upd,
        n_live_tup: stats.n_live_tup,
        n_dead_tup: stats.n_dead_tup,
        n_mod_since_analyze: stats.n_mod_since_analyze.unwrap_or(0),
        heap_blks_read: stats.heap_blks_read,
        heap_blks_hit: stats.heap_blks_hit,
        idx_blks_read: stats.idx_blks_read,
        idx_blks_hit: stats.idx_blks_hit,
        toast_blks_read: stats.toast_blks_read,
        toast_blks_hit: stats.toast_blks_hit,
        tidx_blks_read: stats.tidx_blks_read,
        tidx_blks_hit: stats.tidx_blks_hit,
    }
}

fn encode_index_statistic(index_idx: i32, stats: &IndexStats) -> IndexStatistic {
    IndexStatistic {
        index_idx,
        size_bytes: stats.size_bytes,
        idx_scan: stats.idx_scan,
        idx_tup_read: stats.idx_tup_read,
        idx_tup_fetch: stats.idx_tup_fetch,
        idx_blks_read: stats.idx_blks_read,
        idx_blks_hit: stats.idx_blks_hit,
    }
}

/// Expands an aggregate counter plus its single last-occurrence timestamp
/// into `count` discrete events. The true times of all but the most recent
/// occurrence are unrecoverable, so every event carries the one known
/// timestamp and all but the first are flagged approximate.
fn add_relation_events(
    snapshot: &mut FullSnapshot,
    relation_idx: i32,
    count: i64,
    last_time: i64,
    event_type: RelationEventType,
) {
    if count <= 0 {
        return;
    }

    let occurred_at = epoch_to_utc(last_time);

    for i in 0..count {
        snapshot.relation_events.push(RelationEvent {
            relation_idx,
            event_type,
            occurred_at,
            approximate_occurred_at: i != 0,
        });
    }
}

/// Epoch seconds to UTC, degrading to the epoch itself when the value is
/// outside chrono's representable range.
fn epoch_to_utc(secs: i64) -> DateTime<Utc> {
    match Utc.timestamp_opt(secs, 0).single() {
        Some(ts) => ts,
        None => {
            debug!(secs, "last-occurrence timestamp out of range, using epoch");
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

fn database_idx_for(database_oid_to_idx: &DatabaseOidToIdx, database_oid: Oid) -> i32 {
    match database_oid_to_idx.get(&database_oid) {
        Some(idx) => *idx,
        None => {
            debug!(database_oid, "database not in snapshot index map, using 0");
            0
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::relation::PostgresColumn;

    // -- fixtures --

    fn relation(database_oid: Oid, oid: Oid, name: &str) -> PostgresRelation {
        PostgresRelation {
            database_oid,
            oid,
            schema_name: "public".to_string(),
            relation_name: name.to_string(),
            relation_type: "r".to_string(),
            persistence_type: "p".to_string(),
            ..Default::default()
        }
    }

    fn fk_constraint(name: &str, foreign_oid: Oid) -> PostgresConstraint {
        PostgresConstraint {
            name: name.to_string(),
            constraint_type: "f".to_string(),
            constraint_def: format!("FOREIGN KEY (a) REFERENCES t({})", foreign_oid),
            columns: vec![1],
            foreign_oid,
            foreign_columns: vec![1],
            foreign_update_type: "a".to_string(),
            foreign_delete_type: "c".to_string(),
            foreign_match_type: "s".to_string(),
        }
    }

    fn index(oid: Oid, name: &str) -> PostgresIndex {
        PostgresIndex {
            index_oid: oid,
            name: name.to_string(),
            columns: vec![1],
            index_def: format!("CREATE INDEX {} ON t (a)", name),
            index_type: "btree".to_string(),
            is_valid: true,
            ..Default::default()
        }
    }

    fn relation_sample(vacuum_count: i64, last_vacuum: i64) -> RelationStats {
        RelationStats {
            size_bytes: 8192,
            seq_scan: 5,
            n_live_tup: 100,
            vacuum_count,
            last_vacuum,
            ..Default::default()
        }
    }

    fn diff_with_relation(database_oid: Oid, oid: Oid, stats: RelationStats) -> DiffState {
        let mut diff = DiffState::default();
        diff.schema_stats
            .entry(database_oid)
            .or_default()
            .relation_stats
            .insert(oid, stats);
        diff
    }

    fn db_map() -> DatabaseOidToIdx {
        DatabaseOidToIdx::from([(1, 0), (2, 1)])
    }

    fn encode(relations: &[PostgresRelation], diff: &DiffState) -> FullSnapshot {
        let mut snapshot = FullSnapshot::default();
        transform_postgres_relations(&mut snapshot, relations, diff, &db_map());
        snapshot
    }

    // -- reference pass --

    #[test]
    fn references_are_dense_and_in_input_order() {
        let relations = vec![
            relation(1, 100, "a"),
            relation(1, 101, "b"),
            relation(2, 100, "c"),
        ];
        let snapshot = encode(&relations, &DiffState::default());

        assert_eq!(snapshot.relation_references.len(), 3);
        assert_eq!(snapshot.relation_informations.len(), 3);
        for (i, info) in snapshot.relation_informations.iter().enumerate() {
            assert_eq!(info.relation_idx, i as i32);
        }
        assert_eq!(snapshot.relation_references[2].relation_name, "c");
        assert_eq!(snapshot.relation_references[2].database_idx, 1);
    }

    // -- parent resolution --

    #[test]
    fn no_parent_oid_yields_no_parent_idx() {
        let snapshot = encode(&[relation(1, 100, "plain")], &DiffState::default());
        assert_eq!(snapshot.relation_informations[0].parent_relation_idx, None);
    }

    #[test]
    fn forward_parent_reference_resolves() {
        // Child appears before its parent in input order
        let mut child = relation(1, 100, "measurements_y2026");
        child.parent_table_oid = 200;
        let parent = relation(1, 200, "measurements");

        let snapshot = encode(&[child, parent], &DiffState::default());
        assert_eq!(snapshot.relation_informations[0].parent_relation_idx, Some(1));
        assert_eq!(snapshot.relation_informations[1].parent_relation_idx, None);
    }

    #[test]
    fn uncaptured_parent_is_encoded_as_absent() {
        let mut child = relation(1, 100, "orphan");
        child.parent_table_oid = 999;
        let snapshot = encode(&[child], &DiffState::default());
        assert_eq!(snapshot.relation_informations[0].parent_relation_idx, None);
    }

    // -- constraints --

    #[test]
    fn foreign_key_target_resolves_to_snapshot_index() {
        let mut referencing = relation(1, 100, "orders");
        referencing.constraints.push(fk_constraint("orders_user_fk", 200));
        let referenced = relation(1, 200, "users");

        let snapshot = encode(&[referencing, referenced], &DiffState::default());
        let constraint = &snapshot.relation_informations[0].constraints[0];
        assert_eq!(constraint.foreign_relation_idx, Some(1));
        assert_eq!(constraint.columns, vec![1]);
        assert_eq!(constraint.foreign_columns, vec![1]);
    }

    #[test]
    fn non_foreign_constraint_has_no_target_even_at_index_zero() {
        let mut rel = relation(1, 100, "users");
        rel.constraints.push(PostgresConstraint {
            name: "users_pkey".to_string(),
            constraint_type: "p".to_string(),
            constraint_def: "PRIMARY KEY (id)".to_string(),
            columns: vec![1],
            ..Default::default()
        });
        let snapshot = encode(&[rel], &DiffState::default());
        let constraint = &snapshot.relation_informations[0].constraints[0];
        // foreign_oid == 0 must be absence, not a reference to index 0
        assert_eq!(constraint.foreign_relation_idx, None);
    }

    #[test]
    fn self_referencing_foreign_key_resolves_to_own_index() {
        let mut rel = relation(1, 100, "employees");
        rel.constraints.push(fk_constraint("employees_manager_fk", 100));
        let snapshot = encode(&[rel], &DiffState::default());
        let constraint = &snapshot.relation_informations[0].constraints[0];
        assert_eq!(constraint.foreign_relation_idx, Some(0));
    }

    // -- scalar and optional fields --

    #[test]
    fn view_definition_empty_string_collapses_to_none() {
        let mut view = relation(1, 100, "v_active");
        view.relation_type = "v".to_string();
        view.view_definition = "SELECT 1".to_string();
        let plain = relation(1, 101, "t");

        let snapshot = encode(&[view, plain], &DiffState::default());
        assert_eq!(
            snapshot.relation_informations[0].view_definition.as_deref(),
            Some("SELECT 1")
        );
        assert_eq!(snapshot.relation_informations[1].view_definition, None);
    }

    #[test]
    fn columns_copied_with_optional_defaults() {
        let mut rel = relation(1, 100, "users");
        rel.columns = vec![
            PostgresColumn {
                name: "id".to_string(),
                data_type: "bigint".to_string(),
                not_null: true,
                position: 1,
                default_value: Some("nextval('users_id_seq')".to_string()),
            },
            PostgresColumn {
                name: "note".to_string(),
                data_type: "text".to_string(),
                not_null: false,
                position: 2,
                default_value: None,
            },
        ];
        let snapshot = encode(&[rel], &DiffState::default());
        let columns = &snapshot.relation_informations[0].columns;
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].default_value.as_deref(), Some("nextval('users_id_seq')"));
        assert_eq!(columns[1].default_value, None);
        assert_eq!(columns[1].position, 2);
    }

    #[test]
    fn partition_fields_copied_and_strategy_mapped() {
        let mut rel = relation(1, 100, "measurements");
        rel.relation_type = "p".to_string();
        rel.partition_strategy = "h".to_string();
        rel.partition_columns = vec!["device_id".to_string()];
        rel.partitioned_by = "HASH (device_id)".to_string();
        rel.options = vec!["fillfactor=80".to_string()];

        let snapshot = encode(&[rel], &DiffState::default());
        let info = &snapshot.relation_informations[0];
        assert_eq!(info.partition_strategy, PartitionStrategy::Hash);
        assert_eq!(info.partition_columns, vec!["device_id".to_string()]);
        assert_eq!(info.partitioned_by, "HASH (device_id)");
        assert_eq!(info.fillfactor, 80);
    }

    // -- statistics --

    #[test]
    fn statistics_emitted_only_for_objects_in_delta() {
        let relations = vec![relation(1, 100, "tracked"), relation(1, 101, "fresh")];
        let diff = diff_with_relation(1, 100, relation_sample(0, 0));

        let snapshot = encode(&relations, &diff);
        assert_eq!(snapshot.relation_statistics.len(), 1);
        assert_eq!(snapshot.relation_statistics[0].relation_idx, 0);
        assert_eq!(snapshot.relation_statistics[0].seq_scan, 5);
        assert_eq!(snapshot.relation_statistics[0].n_live_tup, 100);
    }

    #[test]
    fn missing_database_delta_yields_no_statistics() {
        let relations = vec![relation(1, 100, "a"), relation(1, 101, "b")];
        let snapshot = encode(&relations, &DiffState::default());
        assert!(snapshot.relation_statistics.is_empty());
        assert!(snapshot.relation_events.is_empty());
        // Structural records are unaffected
        assert_eq!(snapshot.relation_informations.len(), 2);
    }

    #[test]
    fn n_mod_since_analyze_defaults_to_zero() {
        let mut stats = relation_sample(0, 0);
        stats.n_mod_since_analyze = None;
        let diff = diff_with_relation(1, 100, stats);
        let snapshot = encode(&[relation(1, 100, "t")], &diff);
        assert_eq!(snapshot.relation_statistics[0].n_mod_since_analyze, 0);

        let mut stats = relation_sample(0, 0);
        stats.n_mod_since_analyze = Some(42);
        let diff = diff_with_relation(1, 100, stats);
        let snapshot = encode(&[relation(1, 100, "t")], &diff);
        assert_eq!(snapshot.relation_statistics[0].n_mod_since_analyze, 42);
    }

    // -- events --

    #[test]
    fn event_count_expands_with_approximate_flags() {
        let t = 1_700_000_000;
        let diff = diff_with_relation(1, 100, relation_sample(3, t));
        let snapshot = encode(&[relation(1, 100, "t")], &diff);

        assert_eq!(snapshot.relation_events.len(), 3);
        let expected = Utc.timestamp_opt(t, 0).single().unwrap();
        for event in &snapshot.relation_events {
            assert_eq!(event.relation_idx, 0);
            assert_eq!(event.event_type, RelationEventType::ManualVacuum);
            assert_eq!(event.occurred_at, expected);
        }
        assert!(!snapshot.relation_events[0].approximate_occurred_at);
        assert!(snapshot.relation_events[1].approximate_occurred_at);
        assert!(snapshot.relation_events[2].approximate_occurred_at);
    }

    #[test]
    fn zero_count_produces_no_events() {
        let diff = diff_with_relation(1, 100, relation_sample(0, 1_700_000_000));
        let snapshot = encode(&[relation(1, 100, "t")], &diff);
        assert!(snapshot.relation_events.is_empty());
    }

    #[test]
    fn each_counter_drives_its_own_event_kind() {
        let mut stats = relation_sample(1, 1_700_000_000);
        stats.analyze_count = 2;
        stats.last_analyze = 1_700_000_100;
        stats.autovacuum_count = 1;
        stats.last_autovacuum = 1_700_000_200;
        let diff = diff_with_relation(1, 100, stats);
        let snapshot = encode(&[relation(1, 100, "t")], &diff);

        let count_of = |kind: RelationEventType| {
            snapshot
                .relation_events
                .iter()
                .filter(|e| e.event_type == kind)
                .count()
        };
        assert_eq!(count_of(RelationEventType::ManualAnalyze), 2);
        assert_eq!(count_of(RelationEventType::AutoAnalyze), 0);
        assert_eq!(count_of(RelationEventType::ManualVacuum), 1);
        assert_eq!(count_of(RelationEventType::AutoVacuum), 1);
    }

    #[test]
    fn out_of_range_timestamp_degrades_to_epoch() {
        let diff = diff_with_relation(1, 100, relation_sample(1, i64::MAX));
        let snapshot = encode(&[relation(1, 100, "t")], &diff);
        assert_eq!(snapshot.relation_events.len(), 1);
        assert_eq!(snapshot.relation_events[0].occurred_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    // -- indexes --

    #[test]
    fn indexes_are_encoded_as_children_of_their_relation() {
        let mut a = relation(1, 100, "a");
        a.indices = vec![index(500, "a_pkey"), index(501, "a_value_idx")];
        let mut b = relation(1, 101, "b");
        b.indices = vec![index(600, "b_pkey")];

        let snapshot = encode(&[a, b], &DiffState::default());
        assert_eq!(snapshot.index_references.len(), 3);
        assert_eq!(snapshot.index_informations.len(), 3);
        for (i, info) in snapshot.index_informations.iter().enumerate() {
            assert_eq!(info.index_idx, i as i32);
        }
        assert_eq!(snapshot.index_informations[0].relation_idx, 0);
        assert_eq!(snapshot.index_informations[1].relation_idx, 0);
        assert_eq!(snapshot.index_informations[2].relation_idx, 1);
        assert_eq!(snapshot.index_references[2].index_name, "b_pkey");
        assert_eq!(snapshot.index_references[2].schema_name, "public");
    }

    #[test]
    fn index_constraint_def_uses_optional_convention() {
        let mut rel = relation(1, 100, "t");
        let mut pkey = index(500, "t_pkey");
        pkey.constraint_def = Some("PRIMARY KEY (id)".to_string());
        let mut plain = index(501, "t_value_idx");
        plain.constraint_def = Some(String::new());
        let mut bare = index(502, "t_other_idx");
        bare.constraint_def = None;
        rel.indices = vec![pkey, plain, bare];

        let snapshot = encode(&[rel], &DiffState::default());
        assert_eq!(
            snapshot.index_informations[0].constraint_def.as_deref(),
            Some("PRIMARY KEY (id)")
        );
        assert_eq!(snapshot.index_informations[1].constraint_def, None);
        assert_eq!(snapshot.index_informations[2].constraint_def, None);
    }

    #[test]
    fn index_statistics_looked_up_by_index_oid() {
        let mut rel = relation(1, 100, "t");
        rel.indices = vec![index(500, "tracked_idx"), index(501, "fresh_idx")];

        let mut diff = DiffState::default();
        diff.schema_stats.entry(1).or_default().index_stats.insert(
            500,
            IndexStats {
                size_bytes: 4096,
                idx_scan: 7,
                ..Default::default()
            },
        );

        let snapshot = encode(&[rel], &diff);
        assert_eq!(snapshot.index_statistics.len(), 1);
        assert_eq!(snapshot.index_statistics[0].index_idx, 0);
        assert_eq!(snapshot.index_statistics[0].size_bytes, 4096);
        assert_eq!(snapshot.index_statistics[0].idx_scan, 7);
    }

    // -- determinism --

    #[test]
    fn encoding_is_deterministic() {
        let mut child = relation(1, 100, "child");
        child.parent_table_oid = 200;
        child.constraints.push(fk_constraint("child_fk", 200));
        child.indices = vec![index(500, "child_pkey")];
        let parent = relation(1, 200, "parent");
        let relations = vec![child, parent];
        let diff = diff_with_relation(1, 100, relation_sample(2, 1_700_000_000));

        let first = encode(&relations, &diff);
        let second = encode(&relations, &diff);
        assert_eq!(first, second);
    }
}
