//! Tracked plane surfaces, as supplied by the tracking subsystem

use crate::alignment::Alignment;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tracked plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaneId(pub u64);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane#{}", self.0)
    }
}

/// A detected plane. Read-only to the placement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSurface {
    pub id: PlaneId,
    /// Center of the detected extent, in the plane's local frame
    pub center: Vec3,
    /// Size along the plane's local X and Z axes
    pub extent: Vec2,
    pub alignment: Alignment,
    /// Plane anchor transform; its local Y axis is the surface normal
    pub world_transform: Mat4,
}

impl PlaneSurface {
    /// Local-frame rectangle `(min, max)` over X/Z, padded on every side by
    /// `tolerance` times the extent
    pub fn padded_bounds(&self, tolerance: f32) -> (Vec2, Vec2) {
        let center = Vec2::new(self.center.x, self.center.z);
        let half = self.extent / 2.0 + self.extent * tolerance;
        (center - half, center + half)
    }
}

/// Plane add/update notification with the node anchoring the plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneEvent {
    pub surface: PlaneSurface,
    /// World transform of the node representing the plane
    pub node_transform: Mat4,
}

impl PlaneEvent {
    /// Event for a plane whose node sits at its anchor transform
    pub fn new(surface: PlaneSurface) -> Self {
        let node_transform = surface.world_transform;
        Self {
            surface,
            node_transform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_bounds() {
        let plane = PlaneSurface {
            id: PlaneId(1),
            center: Vec3::new(1.0, 0.0, -1.0),
            extent: Vec2::new(2.0, 4.0),
            alignment: Alignment::Horizontal,
            world_transform: Mat4::IDENTITY,
        };

        let (min, max) = plane.padded_bounds(0.1);
        assert!(min.abs_diff_eq(Vec2::new(-0.2, -3.4), 1e-6));
        assert!(max.abs_diff_eq(Vec2::new(2.2, 1.4), 1e-6));
    }
}
