//! pgsnap — relational-metadata snapshot encoding for PostgreSQL monitoring.
//!
//! Provides:
//! - `state` — captured PostgreSQL object metadata and statistics deltas
//! - `output` — snapshot record types and the relation/index encoder
//! - `service` — PostgreSQL service management (restart, pg_ctl discovery)
//!
//! The central routine is [`output::transform::transform_postgres_relations`],
//! which turns one collection cycle's captured relation state plus the
//! statistics delta since the previous cycle into the cross-referenced
//! sequences of a [`output::snapshot::FullSnapshot`].

pub mod output;
pub mod service;
pub mod state;
