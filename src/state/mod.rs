//! Captured PostgreSQL state models.
//!
//! Everything here arrives fully populated from the collection step: the
//! structural metadata of relations and indexes for the current cycle
//! (`relation`) and the per-database statistics delta computed against the
//! previous cycle (`diff`).

pub mod diff;
pub mod relation;

pub use diff::{DiffState, IndexStats, RelationStats, SchemaStats};
pub use relation::{Oid, PostgresColumn, PostgresConstraint, PostgresIndex, PostgresRelation};
