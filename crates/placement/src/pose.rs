//! Transform helpers shared by the placement components
//!
//! World transforms are column-major [`Mat4`] with the translation stored in
//! `w_axis`. +Y is up.

use glam::{Mat4, Quat, Vec3};
use std::f32::consts::{PI, TAU};

/// Translation component of a world transform
pub fn translation(transform: &Mat4) -> Vec3 {
    transform.w_axis.truncate()
}

/// Replace the translation component, keeping rotation and scale
pub fn with_translation(transform: Mat4, position: Vec3) -> Mat4 {
    let mut result = transform;
    result.w_axis = position.extend(1.0);
    result
}

/// Normalize an angle into (-π, π]
pub fn normalize_angle(angle: f32) -> f32 {
    let normalized = angle % TAU;
    if normalized > PI {
        normalized - TAU
    } else if normalized <= -PI {
        normalized + TAU
    } else {
        normalized
    }
}

/// Committed or presented pose of a placed object
///
/// `transform` is the node transform in world space; `yaw` rotates the
/// object's content about its local vertical axis on top of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub transform: Mat4,
    pub yaw: f32,
}

impl Pose {
    pub fn new(transform: Mat4, yaw: f32) -> Self {
        Self { transform, yaw }
    }

    /// World transform of the object's content (node transform then yaw)
    pub fn world_transform(&self) -> Mat4 {
        self.transform * Mat4::from_rotation_y(self.yaw)
    }

    /// Interpolate towards `target`; `t` is clamped to [0, 1]
    pub fn interpolate(&self, target: &Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        let (scale_a, rotation_a, translation_a) = self.transform.to_scale_rotation_translation();
        let (scale_b, rotation_b, translation_b) =
            target.transform.to_scale_rotation_translation();

        let transform = Mat4::from_scale_rotation_translation(
            scale_a.lerp(scale_b, t),
            slerp(rotation_a, rotation_b, t),
            translation_a.lerp(translation_b, t),
        );

        // Shortest arc between the two yaw angles
        let delta = normalize_angle(target.yaw - self.yaw);
        let yaw = normalize_angle(self.yaw + delta * t);

        Pose { transform, yaw }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            yaw: 0.0,
        }
    }
}

fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
    if t >= 1.0 {
        b
    } else {
        a.slerp(b, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(0.0)).abs() < EPS);
        assert!((normalize_angle(PI) - PI).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((normalize_angle(-5.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((normalize_angle(1.2) - 1.2).abs() < EPS);
    }

    #[test]
    fn test_normalize_angle_is_exact_in_range() {
        for angle in [1.2, -0.4, 0.0001, PI, -3.0] {
            assert_eq!(normalize_angle(angle), angle);
        }
    }

    #[test]
    fn test_with_translation_keeps_rotation() {
        let transform = Mat4::from_rotation_translation(
            Quat::from_rotation_x(0.3),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let moved = with_translation(transform, Vec3::new(-1.0, 0.5, 4.0));

        assert_eq!(translation(&moved), Vec3::new(-1.0, 0.5, 4.0));
        assert_eq!(moved.x_axis, transform.x_axis);
        assert_eq!(moved.y_axis, transform.y_axis);
        assert_eq!(moved.z_axis, transform.z_axis);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Pose::new(Mat4::from_translation(Vec3::ZERO), 0.0);
        let b = Pose::new(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)), 1.0);

        let start = a.interpolate(&b, 0.0);
        let middle = a.interpolate(&b, 0.5);
        let end = a.interpolate(&b, 1.0);

        assert!(translation(&start.transform).abs_diff_eq(Vec3::ZERO, EPS));
        assert!(translation(&middle.transform).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
        assert!((middle.yaw - 0.5).abs() < EPS);
        assert!(translation(&end.transform).abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), EPS));
        assert!((end.yaw - 1.0).abs() < EPS);
    }

    #[test]
    fn test_interpolate_yaw_shortest_arc() {
        let a = Pose::new(Mat4::IDENTITY, 3.0);
        let b = Pose::new(Mat4::IDENTITY, -3.0);

        // Crossing ±π instead of sweeping through zero
        let middle = a.interpolate(&b, 0.5);
        assert!(middle.yaw.abs() > 3.0);
    }
}
