//! Anchor persistence seam
//!
//! Anchors live in the tracking session. The engine only decides when an
//! object's anchor must be replaced; the store performs the replacement.

use glam::Mat4;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque handle to an anchor owned by the tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor#{}", self.0)
    }
}

/// Session-side anchor operations
pub trait AnchorStore {
    /// Create an anchor at a world transform
    fn add_anchor(&mut self, transform: Mat4) -> AnchorId;

    /// Remove an anchor from the session
    fn remove_anchor(&mut self, id: AnchorId);
}

/// In-process anchor store
#[derive(Debug, Default)]
pub struct MemoryAnchorStore {
    anchors: HashMap<AnchorId, Mat4>,
    next_id: u64,
}

impl MemoryAnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: AnchorId) -> Option<&Mat4> {
        self.anchors.get(&id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl AnchorStore for MemoryAnchorStore {
    fn add_anchor(&mut self, transform: Mat4) -> AnchorId {
        self.next_id += 1;
        let id = AnchorId(self.next_id);
        self.anchors.insert(id, transform);
        id
    }

    fn remove_anchor(&mut self, id: AnchorId) {
        self.anchors.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_add_and_remove() {
        let mut store = MemoryAnchorStore::new();
        let a = store.add_anchor(Mat4::IDENTITY);
        let b = store.add_anchor(Mat4::from_translation(Vec3::X));

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        store.remove_anchor(a);
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
    }
}
