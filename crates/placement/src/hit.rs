//! Ray-cast hit candidates and best-hit selection
//!
//! Candidates are ranked by a fixed policy, first match wins:
//!
//! 1. an existing plane hit using the detected geometry, with an allowed
//!    alignment
//! 2. (optional) an existing plane treated as infinite: vertical planes
//!    immediately, horizontal ones only near the object's current height
//! 3. estimated planes, by which alignments the object allows

use crate::alignment::{Alignment, AlignmentSet};
use crate::config::RankingConfig;
use crate::plane::PlaneId;
use crate::pose;
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Source of a ray-cast hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitKind {
    /// Detected plane, within its estimated geometry
    ExistingGeometryPlane,
    /// Detected plane, extended infinitely
    ExistingInfinitePlane,
    /// Horizontal surface estimated from feature points
    EstimatedHorizontal,
    /// Vertical surface estimated from feature points
    EstimatedVertical,
}

/// A ray-cast intersection for a screen query point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitCandidate {
    pub kind: HitKind,
    /// Alignment of the backing plane (plane-backed kinds)
    pub plane_alignment: Option<Alignment>,
    /// Backing plane (plane-backed kinds)
    pub plane: Option<PlaneId>,
    /// Camera-to-hit distance
    pub distance: f32,
    pub world_transform: Mat4,
}

impl HitCandidate {
    /// Hit against a detected plane
    pub fn on_plane(
        kind: HitKind,
        plane: PlaneId,
        alignment: Alignment,
        distance: f32,
        world_transform: Mat4,
    ) -> Self {
        Self {
            kind,
            plane_alignment: Some(alignment),
            plane: Some(plane),
            distance,
            world_transform,
        }
    }

    /// Hit against an estimated surface
    pub fn estimated(kind: HitKind, distance: f32, world_transform: Mat4) -> Self {
        Self {
            kind,
            plane_alignment: None,
            plane: None,
            distance,
            world_transform,
        }
    }

    /// Alignment the object takes when placed on this hit
    pub fn alignment(&self) -> Alignment {
        match (self.kind, self.plane_alignment) {
            (HitKind::EstimatedHorizontal, _) => Alignment::Horizontal,
            (HitKind::EstimatedVertical, _) => Alignment::Vertical,
            (_, Some(alignment)) => alignment,
            (_, None) => Alignment::Horizontal,
        }
    }

    fn plane_allowed(&self, allowed: AlignmentSet) -> bool {
        self.plane_alignment.is_some_and(|a| allowed.contains(a))
    }
}

/// Selects the single best surface hit for a query point
#[derive(Debug, Clone)]
pub struct PlaneHitRanker {
    height_tolerance: f32,
}

impl PlaneHitRanker {
    pub fn new(config: &RankingConfig) -> Self {
        Self {
            height_tolerance: config.height_tolerance,
        }
    }

    /// Pick the best hit, or `None` when nothing usable was hit this frame
    pub fn select_best_hit<'a>(
        &self,
        candidates: &'a [HitCandidate],
        allow_infinite_planes: bool,
        object_height: Option<f32>,
        allowed: AlignmentSet,
    ) -> Option<&'a HitCandidate> {
        if let Some(hit) = candidates
            .iter()
            .find(|c| c.kind == HitKind::ExistingGeometryPlane && c.plane_allowed(allowed))
        {
            return Some(hit);
        }

        if allow_infinite_planes {
            let infinite = candidates
                .iter()
                .filter(|c| c.kind == HitKind::ExistingInfinitePlane && c.plane_allowed(allowed));
            for hit in infinite {
                match hit.plane_alignment {
                    Some(Alignment::Vertical) => return Some(hit),
                    _ => {
                        let near_object = object_height.map_or(true, |height| {
                            let plane_y = pose::translation(&hit.world_transform).y;
                            (plane_y - height).abs() <= self.height_tolerance
                        });
                        if near_object {
                            return Some(hit);
                        }
                    }
                }
            }
        }

        let horizontal = candidates
            .iter()
            .find(|c| c.kind == HitKind::EstimatedHorizontal);
        let vertical = candidates
            .iter()
            .find(|c| c.kind == HitKind::EstimatedVertical);

        match (
            allowed.contains(Alignment::Horizontal),
            allowed.contains(Alignment::Vertical),
        ) {
            (true, false) => horizontal,
            // Vertical-only objects still fall back to the floor
            (false, true) => vertical.or(horizontal),
            (true, true) => match (horizontal, vertical) {
                (Some(h), Some(v)) => Some(if h.distance < v.distance { h } else { v }),
                (h, v) => h.or(v),
            },
            (false, false) => None,
        }
    }
}

impl Default for PlaneHitRanker {
    fn default() -> Self {
        Self::new(&RankingConfig::default())
    }
}
