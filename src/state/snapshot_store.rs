use tracing::debug;

use crate::state::index::build_index;
use crate::types::{MatchRecord, Snapshot};

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// Arrival-ordered snapshots, oldest first. Replaced wholesale after a list
/// round trip, appended to after a scrape; never edited record by record.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, snapshots: Vec<Snapshot>) {
        debug!(count = snapshots.len(), "snapshot store replaced");
        self.snapshots = snapshots;
    }

    pub fn append(&mut self, snapshot: Snapshot) {
        debug!(id = %snapshot.id, rows = snapshot.data.len(), "snapshot appended");
        self.snapshots.push(snapshot);
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Snapshot> {
        self.snapshots.get(position)
    }

    /// The snapshot immediately before `position` in arrival order.
    pub fn previous(&self, position: usize) -> Option<&Snapshot> {
        position.checked_sub(1).and_then(|p| self.snapshots.get(p))
    }

    pub fn index(&self) -> Vec<MatchRecord> {
        build_index(&self.snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{priced, snapshot};

    #[test]
    fn previous_is_by_position() {
        let mut store = SnapshotStore::new();
        store.replace_all(vec![snapshot("b", vec![]), snapshot("a", vec![])]);
        assert!(store.previous(0).is_none());
        assert_eq!(store.previous(1).map(|s| s.id.as_str()), Some("b"));
        assert!(store.previous(5).is_none());
    }

    #[test]
    fn append_then_index() {
        let mut store = SnapshotStore::new();
        store.append(snapshot("s1", vec![priced("X", "0.70")]));
        store.append(snapshot("s2", vec![priced("X", "0.90")]));
        assert_eq!(store.len(), 2);
        assert_eq!(store.index()[0].odds.ah.home_odds, "0.90");

        store.clear();
        assert!(store.is_empty());
        assert!(store.index().is_empty());
    }
}
