//! Encoding transforms from captured state to snapshot records.

pub mod oid_index;
pub mod relations;

pub use oid_index::OidIndexMap;
pub use relations::{DatabaseOidToIdx, transform_postgres_relations};
