//! Distance smoothing for placement targets
//!
//! Ray-cast hits jitter from frame to frame, mostly along the viewing ray.
//! The target keeps the direction of the latest hit but uses the mean of the
//! most recent camera-to-hit distances.

use crate::config::SmoothingConfig;
use crate::object::PlacedObject;
use crate::pose;
use glam::{Mat4, Vec3};

/// Converts raw hits into damped world positions
#[derive(Debug, Clone)]
pub struct SmoothedPlacement {
    window: usize,
    max_distance: f32,
}

impl SmoothedPlacement {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            window: config.window.max(1),
            max_distance: config.max_distance,
        }
    }

    /// Compute the target world position for an object
    ///
    /// With smoothing enabled the clamped distance is pushed onto the
    /// object's history (oldest evicted past the window). Returns `None` when
    /// the hit coincides with the camera and smoothing has no direction to
    /// work with; callers skip the frame.
    pub fn compute_target(
        &self,
        camera_transform: &Mat4,
        raw_hit_transform: &Mat4,
        object: &mut PlacedObject,
        smoothing_enabled: bool,
    ) -> Option<Vec3> {
        let camera_position = pose::translation(camera_transform);
        let mut offset = pose::translation(raw_hit_transform) - camera_position;

        if offset.length() > self.max_distance {
            offset = offset.normalize() * self.max_distance;
        }

        if !smoothing_enabled {
            return Some(camera_position + offset);
        }

        let direction = offset.try_normalize()?;

        let history = &mut object.recent_distances;
        history.push_back(offset.length());
        while history.len() > self.window {
            history.pop_front();
        }

        let average = history.iter().sum::<f32>() / history.len() as f32;
        Some(camera_position + direction * average)
    }
}

impl Default for SmoothedPlacement {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}
