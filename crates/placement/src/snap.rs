//! Corrective snapping of placed objects onto updated planes
//!
//! When plane estimates are refined an object that was placed on an earlier
//! estimate may hover slightly above or sink slightly below the surface.
//! Objects within a small band of the plane are eased onto it.

use crate::alignment_state::{AlignmentOutcome, AlignmentStateMachine};
use crate::config::SnapConfig;
use crate::object::PlacedObject;
use crate::plane::PlaneSurface;
use glam::{Mat4, Vec3};
use tracing::debug;

/// A snap that was applied to an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    /// Distance from the plane before snapping
    pub distance: f32,
    /// Seconds over which the move is presented (ease-in/ease-out)
    pub duration: f32,
    /// Position before the snap relative to `target`, along the plane normal
    pub offset: Vec3,
    /// New world position on the plane surface
    pub target: Vec3,
    /// Result of the instantaneous alignment commit that follows
    pub alignment: AlignmentOutcome,
}

/// Nudges objects onto plane surfaces within a tolerance band
#[derive(Debug, Clone)]
pub struct PlaneSnapAdjuster {
    config: SnapConfig,
}

impl PlaneSnapAdjuster {
    pub fn new(config: &SnapConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Snap `object` onto `plane` if it is almost on it
    ///
    /// `plane_node_transform` is the world transform of the node anchoring
    /// the plane; the object's position is measured in that frame. Returns
    /// `None` when the object is left untouched.
    pub fn try_snap(
        &self,
        object: &mut PlacedObject,
        plane: &PlaneSurface,
        plane_node_transform: &Mat4,
        alignment: &AlignmentStateMachine,
    ) -> Option<Snap> {
        if !object.allowed_alignments().contains(plane.alignment) {
            return None;
        }

        let local = plane_node_transform
            .inverse()
            .transform_point3(object.position());
        if local.y == 0.0 {
            return None;
        }

        let (min, max) = plane.padded_bounds(self.config.edge_tolerance);
        let inside =
            (min.x..=max.x).contains(&local.x) && (min.y..=max.y).contains(&local.z);
        if !inside {
            return None;
        }

        let distance = local.y.abs();
        if distance <= self.config.min_distance || distance >= self.config.max_distance {
            return None;
        }

        let before = object.position();
        let target = plane_node_transform.transform_point3(Vec3::new(local.x, 0.0, local.z));
        object.set_position(target);

        let duration = distance * self.config.seconds_per_unit;
        debug!(
            object = %object.id(),
            plane = %plane.id,
            distance,
            duration,
            "snapping onto plane"
        );

        let committed = object.transform();
        let outcome = alignment.request(object, plane.alignment, &committed, false);

        Some(Snap {
            distance,
            duration,
            offset: before - target,
            target,
            alignment: outcome,
        })
    }
}

impl Default for PlaneSnapAdjuster {
    fn default() -> Self {
        Self::new(&SnapConfig::default())
    }
}
