//! Placed object records
//!
//! A [`PlacedObject`] holds only placement semantics. Rendering nodes are
//! owned by the renderer and linked through the stable [`ObjectId`].

use crate::alignment::{Alignment, AlignmentSet};
use crate::anchor::AnchorId;
use crate::pose::{self, Pose};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Stable identifier linking a placed object to its render node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Model type tag, matching an entry in the [`ModelCatalog`](crate::ModelCatalog)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelKind(String);

impl ModelKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A virtual object placed (or about to be placed) against tracked surfaces
#[derive(Debug, Clone)]
pub struct PlacedObject {
    id: ObjectId,
    model: ModelKind,
    allowed_alignments: AlignmentSet,

    /// Current surface orientation class
    pub(crate) current_alignment: Alignment,

    /// Content rotation about the local vertical axis, in (-π, π]
    yaw: f32,

    /// Yaw remembered from the last horizontal placement
    horizontal_yaw_memory: f32,

    /// Recent camera-to-object distances, oldest first
    pub(crate) recent_distances: VecDeque<f32>,

    /// Set while an alignment transition is in flight
    pub(crate) transition_in_progress: bool,

    /// Committed node transform in world space
    transform: Mat4,

    /// External anchor persisting this object's pose
    pub(crate) anchor: Option<AnchorId>,

    /// Translation the current anchor was created at
    pub(crate) anchored_at: Option<Vec3>,

    placed: bool,
}

impl PlacedObject {
    /// Create an unplaced object with an empty smoothing history
    pub fn new(id: ObjectId, model: ModelKind, allowed_alignments: AlignmentSet) -> Self {
        let current_alignment = allowed_alignments
            .iter()
            .next()
            .unwrap_or(Alignment::Horizontal);

        Self {
            id,
            model,
            allowed_alignments,
            current_alignment,
            yaw: 0.0,
            horizontal_yaw_memory: 0.0,
            recent_distances: VecDeque::new(),
            transition_in_progress: false,
            transform: Mat4::IDENTITY,
            anchor: None,
            anchored_at: None,
            placed: false,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn model(&self) -> &ModelKind {
        &self.model
    }

    pub fn allowed_alignments(&self) -> AlignmentSet {
        self.allowed_alignments
    }

    /// Whether the object may rest on a surface of this alignment
    pub fn is_placement_valid(&self, alignment: Option<Alignment>) -> bool {
        alignment.map_or(true, |a| self.allowed_alignments.contains(a))
    }

    pub fn current_alignment(&self) -> Alignment {
        self.current_alignment
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Write the content yaw
    ///
    /// The value is normalized into (-π, π]. While horizontally aligned the
    /// normalized value is also remembered for the next return to horizontal.
    pub fn set_yaw(&mut self, yaw: f32) {
        let normalized = pose::normalize_angle(yaw);
        self.yaw = normalized;
        if self.current_alignment == Alignment::Horizontal {
            self.horizontal_yaw_memory = normalized;
        }
    }

    pub fn horizontal_yaw_memory(&self) -> f32 {
        self.horizontal_yaw_memory
    }

    pub fn recent_distances(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.recent_distances.iter().copied()
    }

    /// Clear the smoothing history (placement restarts)
    pub fn reset_smoothing(&mut self) {
        self.recent_distances.clear();
    }

    pub fn transition_in_progress(&self) -> bool {
        self.transition_in_progress
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub(crate) fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn position(&self) -> Vec3 {
        pose::translation(&self.transform)
    }

    /// Move the node, keeping rotation and scale
    pub fn set_position(&mut self, position: Vec3) {
        self.transform = pose::with_translation(self.transform, position);
    }

    /// Committed pose (node transform and content yaw)
    pub fn pose(&self) -> Pose {
        Pose::new(self.transform, self.yaw)
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    /// Whether the object has been put on a surface at least once
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub(crate) fn mark_placed(&mut self) {
        self.placed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(allowed: AlignmentSet) -> PlacedObject {
        PlacedObject::new(ObjectId(1), ModelKind::new("cup"), allowed)
    }

    #[test]
    fn test_new_object_is_unplaced() {
        let obj = object(AlignmentSet::HORIZONTAL);
        assert!(!obj.is_placed());
        assert!(obj.anchor().is_none());
        assert_eq!(obj.recent_distances().len(), 0);
        assert!(!obj.transition_in_progress());
    }

    #[test]
    fn test_initial_alignment_is_allowed() {
        let obj = object(AlignmentSet::VERTICAL);
        assert_eq!(obj.current_alignment(), Alignment::Vertical);
        assert!(obj.allowed_alignments().contains(obj.current_alignment()));
    }

    #[test]
    fn test_set_yaw_normalizes_and_remembers() {
        let mut obj = object(AlignmentSet::BOTH);
        obj.set_yaw(1.2 + std::f32::consts::TAU);

        assert!((obj.yaw() - 1.2).abs() < 1e-5);
        assert!((obj.horizontal_yaw_memory() - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_set_yaw_vertical_keeps_memory() {
        let mut obj = object(AlignmentSet::BOTH);
        obj.set_yaw(0.7);
        obj.current_alignment = Alignment::Vertical;
        obj.set_yaw(-0.4);

        assert!((obj.yaw() + 0.4).abs() < 1e-6);
        assert!((obj.horizontal_yaw_memory() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_placement_validity() {
        let obj = object(AlignmentSet::VERTICAL);
        assert!(obj.is_placement_valid(None));
        assert!(obj.is_placement_valid(Some(Alignment::Vertical)));
        assert!(!obj.is_placement_valid(Some(Alignment::Horizontal)));
    }
}
