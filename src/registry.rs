use std::collections::HashSet;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Id of a rendered geometry. Node, way and relation ids are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum OsmId {
    Node(i64),
    Way(i64),
    Relation(i64),
}

impl OsmId {
    pub fn value(self) -> i64 {
        match self {
            OsmId::Node(id) | OsmId::Way(id) | OsmId::Relation(id) => id,
        }
    }
}

impl fmt::Display for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OsmId::Node(id) => write!(f, "node/{}", id),
            OsmId::Way(id) => write!(f, "way/{}", id),
            OsmId::Relation(id) => write!(f, "relation/{}", id),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    ids: HashSet<OsmId>,
    // smallest id seen so far, never above zero
    min_id: i64,
}

/// Ids of all geometries emitted during an import session.
///
/// Shared between resolver threads. Registration is idempotent so that
/// overlapping input batches don't emit the same geometry twice.
#[derive(Debug, Default)]
pub struct Registry {
    state: Mutex<State>,
}

impl Registry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers `id` and returns `true` if it was not known before.
    pub fn register(&self, id: OsmId) -> bool {
        let mut state = self.state.lock();
        state.min_id = state.min_id.min(id.value());
        state.ids.insert(id)
    }

    /// Forgets `id` so a later batch may emit it again.
    pub fn release(&self, id: OsmId) -> bool {
        self.state.lock().ids.remove(&id)
    }

    pub fn contains(&self, id: OsmId) -> bool {
        self.state.lock().ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.state.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hands out a fresh negative id for an object that doesn't exist in the
    /// OSM database yet. The id is below every id registered so far.
    pub fn allocate(&self) -> i64 {
        let mut state = self.state.lock();
        state.min_id -= 1;
        state.min_id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        let registry = Registry::new();
        assert!(registry.register(OsmId::Way(42)));
        assert!(!registry.register(OsmId::Way(42)));
        assert!(!registry.register(OsmId::Way(42)));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(OsmId::Way(42)));
    }

    #[test]
    fn released_id_can_register_again() {
        let registry = Registry::new();
        assert!(registry.register(OsmId::Node(3)));
        assert!(registry.release(OsmId::Node(3)));
        assert!(!registry.release(OsmId::Node(3)));
        assert!(registry.register(OsmId::Node(3)));
    }

    #[test]
    fn kinds_do_not_collide() {
        let registry = Registry::new();
        assert!(registry.register(OsmId::Node(7)));
        assert!(registry.register(OsmId::Way(7)));
        assert!(registry.register(OsmId::Relation(7)));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn allocated_ids_stay_below_registered_ones() {
        let registry = Registry::new();
        assert_eq!(registry.allocate(), -1);
        registry.register(OsmId::Way(-10));
        assert_eq!(registry.allocate(), -11);
        assert_eq!(registry.allocate(), -12);
        registry.register(OsmId::Node(5));
        assert_eq!(registry.allocate(), -13);
    }

    #[test]
    fn concurrent_registration() {
        let registry = Registry::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for id in 0..100 {
                        registry.register(OsmId::Way(id));
                    }
                });
            }
        });
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn display() {
        assert_eq!(OsmId::Relation(3).to_string(), "relation/3");
    }
}
