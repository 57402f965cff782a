//! Scene files describing a scripted placement session

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use placement::{Alignment, PlaneId, PlaneSurface};
use serde::Deserialize;
use std::path::Path;

/// Scripted scene replayed by the simulator, loaded from TOML
#[derive(Debug, Deserialize, Clone)]
pub struct Scene {
    /// Model to place
    pub model: String,
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Seconds per frame
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default = "default_true")]
    pub smoothing: bool,
    #[serde(default)]
    pub infinite_planes: bool,
    /// Height of the estimated floor used when no plane is hit
    #[serde(default)]
    pub estimated_floor_y: f32,
    pub camera: PathConfig,
    /// Point the user drags the object towards
    pub target: PathConfig,
    #[serde(default)]
    pub planes: Vec<ScenePlane>,
    #[serde(default)]
    pub refinements: Vec<Refinement>,
    #[serde(default)]
    pub interruptions: Vec<Interruption>,
}

fn default_frames() -> usize {
    240
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

fn default_true() -> bool {
    true
}

/// Linear path between two points over the whole run
#[derive(Debug, Deserialize, Clone)]
pub struct PathConfig {
    pub start: [f32; 3],
    pub end: [f32; 3],
}

impl PathConfig {
    pub fn at(&self, t: f32) -> Vec3 {
        Vec3::from(self.start).lerp(Vec3::from(self.end), t.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScenePlane {
    pub id: u64,
    pub alignment: Alignment,
    pub position: [f32; 3],
    /// Euler rotation in degrees (XYZ)
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default)]
    pub center: [f32; 3],
    pub extent: [f32; 2],
    /// Frame on which the plane is first detected
    #[serde(default)]
    pub detected_at: usize,
}

impl ScenePlane {
    pub fn transform(&self) -> Mat4 {
        let [x, y, z] = self.rotation.map(f32::to_radians);
        Mat4::from_rotation_translation(
            Quat::from_euler(EulerRot::XYZ, x, y, z),
            Vec3::from(self.position),
        )
    }

    pub fn surface(&self) -> PlaneSurface {
        PlaneSurface {
            id: PlaneId(self.id),
            center: Vec3::from(self.center),
            extent: Vec2::from(self.extent),
            alignment: self.alignment,
            world_transform: self.transform(),
        }
    }
}

/// Plane estimate refined at a given frame
#[derive(Debug, Deserialize, Clone)]
pub struct Refinement {
    pub frame: usize,
    pub plane: u64,
    /// Shift along the plane normal
    pub offset: f32,
}

/// Span of frames with tracking unavailable
#[derive(Debug, Deserialize, Clone)]
pub struct Interruption {
    pub start: usize,
    pub end: usize,
}

impl Scene {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&source)?)
    }

    pub fn builtin() -> anyhow::Result<Self> {
        Ok(toml::from_str(include_str!("../scenes/living_room.toml"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scene_parses() {
        let scene = Scene::builtin().unwrap();
        assert_eq!(scene.model, "sticky note");
        assert_eq!(scene.planes.len(), 2);
        assert!(scene.smoothing);
    }

    #[test]
    fn test_wall_normal_faces_camera() {
        let scene = Scene::builtin().unwrap();
        let wall = scene
            .planes
            .iter()
            .find(|p| p.alignment == Alignment::Vertical)
            .unwrap();
        let normal = wall.transform().transform_vector3(Vec3::Y);
        assert!(normal.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_path_is_clamped() {
        let path = PathConfig {
            start: [0.0, 0.0, 0.0],
            end: [2.0, 0.0, 0.0],
        };
        assert_eq!(path.at(0.5), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(path.at(3.0), Vec3::new(2.0, 0.0, 0.0));
    }
}
