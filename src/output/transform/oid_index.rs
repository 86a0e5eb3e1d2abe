//! Dense snapshot-local index assignment for (database OID, object OID) keys.

use std::collections::HashMap;

use crate::state::relation::Oid;

/// Per-snapshot mapping from a composite OID key to a dense zero-based index.
///
/// Created fresh at the start of a snapshot build and discarded with it;
/// indices are assigned in first-seen order and are never reused across
/// snapshots. Registration and lookup are strictly separated: the reference
/// pass registers every object before any resolution happens, so forward
/// references (partition parents, foreign-key targets appearing later in
/// the input) always resolve.
#[derive(Debug, Default)]
pub struct OidIndexMap {
    map: HashMap<(Oid, Oid), i32>,
    next: i32,
}

impl OidIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next dense index to the key and returns it.
    ///
    /// Each physical object must be registered exactly once per snapshot.
    /// Registering a key twice hands out a second, distinct index and
    /// shadows the first mapping; the caller's reference list then has a
    /// stale entry, which is a contract violation on the caller's side.
    pub fn register(&mut self, database_oid: Oid, oid: Oid) -> i32 {
        let idx = self.next;
        self.next += 1;
        self.map.insert((database_oid, oid), idx);
        idx
    }

    /// Pure lookup. `None` means the key was never registered this
    /// snapshot — e.g. a foreign-key target that was not captured this
    /// cycle. Never returns a fabricated default index.
    pub fn resolve(&self, database_oid: Oid, oid: Oid) -> Option<i32> {
        self.map.get(&(database_oid, oid)).copied()
    }

    /// Number of indices handed out so far.
    pub fn len(&self) -> usize {
        self.next as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}
