//! Synthetic tracking session
//!
//! Produces what a real tracker would hand to the placement engine: camera
//! poses, plane detections and refinements, and noisy ray-cast hits for the
//! point the user is dragging towards.

use crate::scene::{Scene, ScenePlane};
use glam::{Mat4, Vec2, Vec3};
use placement::{
    pose, Alignment, FrameUpdate, HitCandidate, HitKind, ObjectId, PlacementQuery, PlacementTask,
    PlaneEvent, PlaneId, TrackingState,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct TrackedPlane {
    layout: ScenePlane,
    /// Accumulated refinement along the normal
    offset: f32,
}

impl TrackedPlane {
    fn transform(&self) -> Mat4 {
        let base = self.layout.transform();
        let normal = base.transform_vector3(Vec3::Y).normalize();
        pose::with_translation(base, pose::translation(&base) + normal * self.offset)
    }

    fn event(&self) -> PlaneEvent {
        let mut surface = self.layout.surface();
        surface.world_transform = self.transform();
        PlaneEvent::new(surface)
    }

    /// Ray intersection: world hit point, distance, and whether it falls
    /// inside the detected extent
    fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<(Vec3, f32, bool)> {
        let transform = self.transform();
        let normal = transform.transform_vector3(Vec3::Y).normalize();
        let denom = normal.dot(direction);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = normal.dot(pose::translation(&transform) - origin) / denom;
        if t <= 0.0 {
            return None;
        }

        let point = origin + direction * t;
        let local = transform.inverse().transform_point3(point);
        let center = Vec2::new(self.layout.center[0], self.layout.center[2]);
        let half = Vec2::from(self.layout.extent) / 2.0;
        let inside = (local.x - center.x).abs() <= half.x && (local.z - center.y).abs() <= half.y;
        Some((point, t, inside))
    }
}

/// Frame-by-frame task generator for a scene
pub struct SyntheticTracker {
    scene: Scene,
    object: ObjectId,
    planes: Vec<TrackedPlane>,
    rng: StdRng,
    noise: f32,
    tracking: TrackingState,
}

impl SyntheticTracker {
    pub fn new(scene: Scene, object: ObjectId, seed: u64, noise: f32) -> Self {
        Self {
            planes: Vec::new(),
            object,
            rng: StdRng::seed_from_u64(seed),
            noise: noise.abs(),
            tracking: TrackingState::Normal,
            scene,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.scene.frames
    }

    /// Tasks observed on frame `index`, in the order the session reports them
    pub fn tasks_for_frame(&mut self, index: usize) -> Vec<PlacementTask> {
        let mut tasks = Vec::new();

        let tracking = if self
            .scene
            .interruptions
            .iter()
            .any(|span| (span.start..span.end).contains(&index))
        {
            TrackingState::NotAvailable
        } else {
            TrackingState::Normal
        };
        if tracking != self.tracking {
            self.tracking = tracking;
            tasks.push(PlacementTask::TrackingChanged(tracking));
        }

        for layout in &self.scene.planes {
            if layout.detected_at == index {
                let plane = TrackedPlane {
                    layout: layout.clone(),
                    offset: 0.0,
                };
                tasks.push(PlacementTask::PlaneAdded(plane.event()));
                self.planes.push(plane);
            }
        }

        for refinement in self.scene.refinements.iter().filter(|r| r.frame == index) {
            if let Some(plane) = self
                .planes
                .iter_mut()
                .find(|p| p.layout.id == refinement.plane)
            {
                plane.offset += refinement.offset;
                tasks.push(PlacementTask::PlaneUpdated(plane.event()));
            }
        }

        let progress = index as f32 / self.scene.frames.max(1) as f32;
        let eye = self.scene.camera.at(progress);
        let target = self.scene.target.at(progress);
        let camera_transform = Mat4::look_at_rh(eye, target, Vec3::Y).inverse();

        let query = if self.tracking == TrackingState::Normal {
            Some(PlacementQuery {
                object: self.object,
                screen_point: Vec2::new(0.5, 0.5),
                hits: self.cast(eye, target),
                smoothing: self.scene.smoothing,
                infinite_planes: self.scene.infinite_planes,
            })
        } else {
            None
        };

        tasks.push(PlacementTask::Frame(FrameUpdate {
            camera_transform,
            dt: self.scene.dt,
            query,
        }));
        tasks
    }

    fn cast(&mut self, eye: Vec3, target: Vec3) -> Vec<HitCandidate> {
        let Some(direction) = (target - eye).try_normalize() else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        for plane in &self.planes {
            let Some((point, distance, inside)) = plane.intersect(eye, direction) else {
                continue;
            };
            let jitter = self.rng.random_range(-self.noise..=self.noise);
            let point = point + direction * jitter;
            let world_transform = pose::with_translation(plane.transform(), point);
            let id = PlaneId(plane.layout.id);
            let alignment = plane.layout.alignment;

            if inside {
                hits.push(HitCandidate::on_plane(
                    HitKind::ExistingGeometryPlane,
                    id,
                    alignment,
                    distance + jitter,
                    world_transform,
                ));
            }
            hits.push(HitCandidate::on_plane(
                HitKind::ExistingInfinitePlane,
                id,
                alignment,
                distance + jitter,
                world_transform,
            ));
            if alignment == Alignment::Vertical {
                hits.push(HitCandidate::estimated(
                    HitKind::EstimatedVertical,
                    distance + jitter,
                    world_transform,
                ));
            }
        }

        // Feature-point floor estimate
        if direction.y < -1e-6 {
            let t = (self.scene.estimated_floor_y - eye.y) / direction.y;
            let jitter = self.rng.random_range(-self.noise..=self.noise);
            let point = eye + direction * (t + jitter);
            hits.push(HitCandidate::estimated(
                HitKind::EstimatedHorizontal,
                t + jitter,
                Mat4::from_translation(point),
            ));
        }

        // Real sessions report hits nearest first
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
