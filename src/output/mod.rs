//! Snapshot output: record types and the encoding transform.

pub mod snapshot;
pub mod transform;
