//! Alignment transitions for placed objects
//!
//! An object is either horizontally or vertically aligned. Requests to
//! change alignment commit immediately and start a visual transition; while
//! that transition is in flight further requests are dropped, not queued.
//!
//! | from \ to  | Horizontal            | Vertical               |
//! |------------|-----------------------|------------------------|
//! | Horizontal | no-op                 | yaw set to epsilon     |
//! | Vertical   | yaw restored from memory | transform only      |

use crate::alignment::Alignment;
use crate::config::AlignmentConfig;
use crate::object::PlacedObject;
use crate::pose::{self, Pose};
use glam::Mat4;
use tracing::{debug, trace};

/// Result of an alignment request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentOutcome {
    /// A transition is already in flight; the request was dropped
    Busy,
    /// Object already rests horizontally; nothing written
    Settled,
    /// Alignment committed; the transition must be scheduled and completed
    Started(AlignmentTransition),
}

/// Visual transition produced by a committed alignment change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTransition {
    /// Pose presented before the change
    pub from: Pose,
    /// Seconds to animate; zero applies instantly
    pub duration: f32,
    /// Yaw written as part of the change
    pub yaw_override: Option<f32>,
}

/// Decides how an object moves between horizontal and vertical alignment
#[derive(Debug, Clone)]
pub struct AlignmentStateMachine {
    transition_duration: f32,
    vertical_yaw_epsilon: f32,
}

impl AlignmentStateMachine {
    pub fn new(config: &AlignmentConfig) -> Self {
        Self {
            transition_duration: config.transition_duration,
            vertical_yaw_epsilon: config.vertical_yaw_epsilon,
        }
    }

    /// Request that an object take on `new_alignment`
    ///
    /// The node keeps its current (already smoothed) translation and takes
    /// rotation and scale from `new_transform`. On [`AlignmentOutcome::Started`]
    /// the object is marked busy until [`complete`](Self::complete) runs.
    pub fn request(
        &self,
        object: &mut PlacedObject,
        new_alignment: Alignment,
        new_transform: &Mat4,
        allow_animation: bool,
    ) -> AlignmentOutcome {
        if object.transition_in_progress {
            trace!(object = %object.id(), "alignment request dropped, transition in flight");
            return AlignmentOutcome::Busy;
        }

        let current = object.current_alignment;
        if new_alignment == Alignment::Horizontal && current == Alignment::Horizontal {
            return AlignmentOutcome::Settled;
        }

        debug_assert!(
            object.allowed_alignments().contains(new_alignment),
            "{} does not allow {new_alignment} alignment",
            object.model()
        );

        let duration = if new_alignment != current && allow_animation {
            self.transition_duration
        } else {
            0.0
        };

        let yaw_override = match (current, new_alignment) {
            (Alignment::Vertical, Alignment::Horizontal) => Some(object.horizontal_yaw_memory()),
            (Alignment::Horizontal, Alignment::Vertical) => Some(self.vertical_yaw_epsilon),
            _ => None,
        };

        let from = object.pose();

        object.current_alignment = new_alignment;
        object.transition_in_progress = true;

        let position = object.position();
        object.set_transform(pose::with_translation(*new_transform, position));
        if let Some(yaw) = yaw_override {
            object.set_yaw(yaw);
        }

        if current != new_alignment {
            debug!(
                object = %object.id(),
                from = %current,
                to = %new_alignment,
                duration,
                "alignment changed"
            );
        }

        AlignmentOutcome::Started(AlignmentTransition {
            from,
            duration,
            yaw_override,
        })
    }

    /// Transition finished; accept requests again
    pub fn complete(&self, object: &mut PlacedObject) {
        object.transition_in_progress = false;
    }
}

impl Default for AlignmentStateMachine {
    fn default() -> Self {
        Self::new(&AlignmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignmentSet;
    use crate::object::{ModelKind, ObjectId};
    use glam::{Quat, Vec3};

    fn note() -> PlacedObject {
        PlacedObject::new(ObjectId(1), ModelKind::new("sticky note"), AlignmentSet::BOTH)
    }

    fn wall_transform() -> Mat4 {
        Mat4::from_rotation_translation(
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
            Vec3::new(5.0, 5.0, 5.0),
        )
    }

    fn started(outcome: AlignmentOutcome) -> AlignmentTransition {
        match outcome {
            AlignmentOutcome::Started(transition) => transition,
            other => panic!("expected a started transition, got {other:?}"),
        }
    }

    #[test]
    fn test_horizontal_to_horizontal_is_noop() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();
        obj.set_position(Vec3::new(1.0, 0.0, 1.0));
        let before = obj.transform();

        let outcome = machine.request(&mut obj, Alignment::Horizontal, &wall_transform(), true);

        assert_eq!(outcome, AlignmentOutcome::Settled);
        assert_eq!(obj.transform(), before);
        assert!(!obj.transition_in_progress());
    }

    #[test]
    fn test_turning_vertical_animates_and_uses_epsilon_yaw() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();
        obj.set_yaw(0.8);

        let transition = started(machine.request(
            &mut obj,
            Alignment::Vertical,
            &wall_transform(),
            true,
        ));

        assert_eq!(transition.duration, 0.5);
        assert_eq!(obj.current_alignment(), Alignment::Vertical);
        assert_eq!(obj.yaw(), 0.0001);
        assert_ne!(obj.yaw(), 0.0);
        // Memory untouched while vertical
        assert!((obj.horizontal_yaw_memory() - 0.8).abs() < 1e-6);
        assert!(obj.transition_in_progress());
    }

    #[test]
    fn test_returning_horizontal_restores_yaw() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();
        obj.set_yaw(1.2);

        machine.request(&mut obj, Alignment::Vertical, &wall_transform(), true);
        machine.complete(&mut obj);
        machine.request(&mut obj, Alignment::Horizontal, &Mat4::IDENTITY, true);

        assert_eq!(obj.current_alignment(), Alignment::Horizontal);
        assert_eq!(obj.yaw(), 1.2);
        assert_eq!(obj.horizontal_yaw_memory(), 1.2);
    }

    #[test]
    fn test_keeps_smoothed_translation() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();
        obj.set_position(Vec3::new(0.5, 1.0, -2.0));

        machine.request(&mut obj, Alignment::Vertical, &wall_transform(), true);

        assert_eq!(obj.position(), Vec3::new(0.5, 1.0, -2.0));
        let (_, rotation, _) = obj.transform().to_scale_rotation_translation();
        assert!(rotation.abs_diff_eq(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2), 1e-5));
    }

    #[test]
    fn test_request_while_busy_is_dropped() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();

        machine.request(&mut obj, Alignment::Vertical, &wall_transform(), true);
        let transform = obj.transform();
        let yaw = obj.yaw();

        let outcome = machine.request(&mut obj, Alignment::Horizontal, &Mat4::IDENTITY, true);

        assert_eq!(outcome, AlignmentOutcome::Busy);
        assert_eq!(obj.current_alignment(), Alignment::Vertical);
        assert_eq!(obj.transform(), transform);
        assert_eq!(obj.yaw(), yaw);
        assert!(obj.transition_in_progress());
    }

    #[test]
    fn test_no_animation_when_disallowed() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();

        let transition = started(machine.request(
            &mut obj,
            Alignment::Vertical,
            &wall_transform(),
            false,
        ));
        assert_eq!(transition.duration, 0.0);
    }

    #[test]
    fn test_vertical_to_vertical_updates_transform_only() {
        let machine = AlignmentStateMachine::default();
        let mut obj = note();

        machine.request(&mut obj, Alignment::Vertical, &wall_transform(), true);
        machine.complete(&mut obj);
        obj.set_yaw(0.3);

        let turned = Mat4::from_rotation_y(1.0) * wall_transform();
        let transition = started(machine.request(&mut obj, Alignment::Vertical, &turned, true));

        assert_eq!(transition.duration, 0.0);
        assert_eq!(transition.yaw_override, None);
        assert_eq!(obj.yaw(), 0.3);
        let (_, rotation, _) = obj.transform().to_scale_rotation_translation();
        let (_, expected, _) = turned.to_scale_rotation_translation();
        assert!(rotation.abs_diff_eq(expected, 1e-5));
    }
}
