//! Structural metadata of PostgreSQL relations and their indexes.
//!
//! One `PostgresRelation` per table/view/partition captured this cycle,
//! with nested columns, constraints, and indexes. Cross-object links
//! (partition parent, foreign-key target) are carried as raw OIDs and only
//! resolved to snapshot-local indices by the output transform.

use serde::{Deserialize, Serialize};

/// PostgreSQL object identifier.
pub type Oid = u32;

/// Fillfactor applied when a table declares none in its storage options.
const DEFAULT_TABLE_FILLFACTOR: i32 = 100;

/// Fillfactor applied when an index declares none in its storage options
/// (the btree default).
const DEFAULT_INDEX_FILLFACTOR: i32 = 90;

/// A relation (table, view, materialized view, partition) as captured from
/// the system catalogs for one collection cycle.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PostgresRelation {
    /// OID of the owning database.
    /// Source: `pg_database.oid`
    pub database_oid: Oid,

    /// OID of the relation (diff key).
    /// Source: `pg_class.oid`
    pub oid: Oid,

    /// Schema name.
    /// Source: `pg_namespace.nspname`
    pub schema_name: String,

    /// Relation name.
    /// Source: `pg_class.relname`
    pub relation_name: String,

    /// Relation kind as a single-character code (r, v, m, p, ...).
    /// Source: `pg_class.relkind`
    pub relation_type: String,

    /// Persistence kind as a single-character code (p, u, t).
    /// Source: `pg_class.relpersistence`
    pub persistence_type: String,

    /// Whether rows carry OIDs (pre-PG 12 servers only).
    /// Source: `pg_class.relhasoids`
    pub has_oids: bool,

    /// Whether the relation has inheritance children or partitions.
    /// Source: `pg_class.relhassubclass`
    pub has_inheritance_children: bool,

    /// Whether a TOAST table is attached.
    /// Source: `pg_class.reltoastrelid != 0`
    pub has_toast: bool,

    /// Oldest unfrozen transaction ID.
    /// Source: `pg_class.relfrozenxid`
    pub frozen_xid: u32,

    /// Oldest multixact ID still present.
    /// Source: `pg_class.relminmxid`
    pub minimum_multixact_xid: u32,

    /// OID of the partition/inheritance parent, 0 = no parent.
    /// Source: `pg_inherits.inhparent`
    pub parent_table_oid: Oid,

    /// Partition bound expression, empty for non-partitions.
    /// Source: `pg_get_expr(pg_class.relpartbound, oid)`
    pub partition_boundary: String,

    /// Partition strategy as a single-character code (r, l, h), empty for
    /// non-partitioned relations.
    /// Source: `pg_partitioned_table.partstrat`
    pub partition_strategy: String,

    /// Names of the partitioning columns.
    /// Source: `pg_partitioned_table.partattrs` joined to `pg_attribute`
    pub partition_columns: Vec<String>,

    /// Full partition key definition, empty for non-partitioned relations.
    /// Source: `pg_get_partkeydef(oid)`
    pub partitioned_by: String,

    /// True when an exclusive lock prevented the collector from reading
    /// details this cycle; structural fields may then be empty.
    pub exclusively_locked: bool,

    /// Raw storage options, e.g. `fillfactor=70`.
    /// Source: `pg_class.reloptions`
    pub options: Vec<String>,

    /// View definition, empty for non-views.
    /// Source: `pg_get_viewdef(oid)`
    pub view_definition: String,

    /// Column descriptions in attribute order.
    pub columns: Vec<PostgresColumn>,

    /// Constraint descriptions.
    pub constraints: Vec<PostgresConstraint>,

    /// Indexes owned by this relation.
    pub indices: Vec<PostgresIndex>,
}

impl PostgresRelation {
    /// Effective fillfactor: the `fillfactor=N` storage option, or 100.
    pub fn fillfactor(&self) -> i32 {
        parse_fillfactor(&self.options, DEFAULT_TABLE_FILLFACTOR)
    }
}

/// A single column of a relation.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PostgresColumn {
    /// Column name.
    /// Source: `pg_attribute.attname`
    pub name: String,

    /// Formatted data type.
    /// Source: `format_type(atttypid, atttypmod)`
    pub data_type: String,

    /// NOT NULL constraint present.
    /// Source: `pg_attribute.attnotnull`
    pub not_null: bool,

    /// Ordinal position, starting at 1.
    /// Source: `pg_attribute.attnum`
    pub position: i32,

    /// Default expression, `None` when the column has no default.
    /// Source: `pg_get_expr(pg_attrdef.adbin, adrelid)`
    pub default_value: Option<String>,
}

/// A constraint attached to a relation.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PostgresConstraint {
    /// Constraint name.
    /// Source: `pg_constraint.conname`
    pub name: String,

    /// Constraint kind as a single-character code (c, f, p, u, t, x).
    /// Source: `pg_constraint.contype`
    pub constraint_type: String,

    /// Full constraint definition.
    /// Source: `pg_get_constraintdef(oid)`
    pub constraint_def: String,

    /// Ordinals of the constrained local columns.
    /// Source: `pg_constraint.conkey`
    pub columns: Vec<i32>,

    /// OID of the referenced relation for foreign keys, 0 = none.
    /// Source: `pg_constraint.confrelid`
    pub foreign_oid: Oid,

    /// Ordinals of the referenced columns for foreign keys.
    /// Source: `pg_constraint.confkey`
    pub foreign_columns: Vec<i32>,

    /// Foreign key ON UPDATE action code (a, r, c, n, d).
    /// Source: `pg_constraint.confupdtype`
    pub foreign_update_type: String,

    /// Foreign key ON DELETE action code (a, r, c, n, d).
    /// Source: `pg_constraint.confdeltype`
    pub foreign_delete_type: String,

    /// Foreign key match kind code (f, p, s).
    /// Source: `pg_constraint.confmatchtype`
    pub foreign_match_type: String,
}

/// An index as captured from the system catalogs.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PostgresIndex {
    /// OID of the index (diff key).
    /// Source: `pg_index.indexrelid`
    pub index_oid: Oid,

    /// Index name.
    /// Source: `pg_class.relname` of the index relation
    pub name: String,

    /// Ordinals of the indexed columns, 0 for expression members.
    /// Source: `pg_index.indkey`
    pub columns: Vec<i32>,

    /// Full index definition.
    /// Source: `pg_get_indexdef(indexrelid)`
    pub index_def: String,

    /// Definition of the constraint backed by this index, if any.
    /// Source: `pg_get_constraintdef(pg_constraint.oid)`
    pub constraint_def: Option<String>,

    /// Access method name (btree, hash, gin, ...).
    /// Source: `pg_am.amname`
    pub index_type: String,

    /// Whether this is the primary key index.
    /// Source: `pg_index.indisprimary`
    pub is_primary: bool,

    /// Whether the index enforces uniqueness.
    /// Source: `pg_index.indisunique`
    pub is_unique: bool,

    /// Whether the index is valid for queries.
    /// Source: `pg_index.indisvalid`
    pub is_valid: bool,

    /// Raw storage options of the index relation.
    /// Source: `pg_class.reloptions`
    pub options: Vec<String>,
}

impl PostgresIndex {
    /// Effective fillfactor: the `fillfactor=N` storage option, or 90.
    pub fn fillfactor(&self) -> i32 {
        parse_fillfactor(&self.options, DEFAULT_INDEX_FILLFACTOR)
    }
}

fn parse_fillfactor(options: &[String], default: i32) -> i32 {
    for option in options {
        if let Some(value) = option.strip_prefix("fillfactor=")
            && let Ok(fillfactor) = value.trim().parse::<i32>()
        {
            return fillfactor;
        }
    }
    default
}
