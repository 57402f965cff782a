//! Scheduled pose transitions with completion signals
//!
//! The animator never mutates objects. A pose transition remembers where it
//! started and presents that start interpolated towards the object's
//! committed pose. An offset transition only displaces the committed
//! position and decays to nothing, so later writes to the object show
//! through at once. Every scheduled transition completes exactly once,
//! zero-duration ones included, and the completion is handed back to the
//! caller to deliver on the owning queue.

use crate::object::ObjectId;
use crate::pose::{self, Pose};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Handle to a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

/// Timing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            // Cubic smoothstep
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// What a transition animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Change of surface alignment; clears the object's busy flag on completion
    Alignment,
    /// Corrective move onto a plane surface
    Snap,
}

/// A finished transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub id: TransitionId,
    pub object: ObjectId,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    /// Whole pose, from this start towards the committed pose
    Pose(Pose),
    /// Translation added to the committed position, decaying to zero
    Offset(Vec3),
}

#[derive(Debug, Clone)]
struct Transition {
    id: TransitionId,
    object: ObjectId,
    kind: TransitionKind,
    motion: Motion,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Transition {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    fn eased(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    fn presents(&self, object: ObjectId) -> bool {
        self.object == object && self.duration > 0.0
    }
}

/// Clock driving all in-flight transitions
#[derive(Debug, Default)]
pub struct Animator {
    active: Vec<Transition>,
    next_id: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a transition starting at `from`
    ///
    /// Negative or NaN durations are treated as zero.
    pub fn schedule(
        &mut self,
        object: ObjectId,
        kind: TransitionKind,
        from: Pose,
        duration: f32,
        easing: Easing,
    ) -> TransitionId {
        self.push(object, kind, Motion::Pose(from), duration, easing)
    }

    /// Schedule a transition presenting the object displaced by `offset`,
    /// easing back onto its committed position
    pub fn schedule_offset(
        &mut self,
        object: ObjectId,
        kind: TransitionKind,
        offset: Vec3,
        duration: f32,
        easing: Easing,
    ) -> TransitionId {
        self.push(object, kind, Motion::Offset(offset), duration, easing)
    }

    fn push(
        &mut self,
        object: ObjectId,
        kind: TransitionKind,
        motion: Motion,
        duration: f32,
        easing: Easing,
    ) -> TransitionId {
        self.next_id += 1;
        let id = TransitionId(self.next_id);
        let duration = if duration > 0.0 { duration } else { 0.0 };
        self.active.push(Transition {
            id,
            object,
            kind,
            motion,
            duration,
            elapsed: 0.0,
            easing,
        });
        id
    }

    /// Advance the clock by `dt` seconds and collect finished transitions
    pub fn advance(&mut self, dt: f32) -> Vec<Completion> {
        let dt = dt.max(0.0);
        for transition in &mut self.active {
            transition.elapsed += dt;
        }

        let mut completions = Vec::new();
        self.active.retain(|transition| {
            if transition.elapsed >= transition.duration {
                completions.push(Completion {
                    id: transition.id,
                    object: transition.object,
                    kind: transition.kind,
                });
                false
            } else {
                true
            }
        });
        completions
    }

    /// Pose to present for an object whose committed pose is `committed`
    ///
    /// The newest timed pose transition for the object wins; offsets of all
    /// timed offset transitions are added on top.
    pub fn presented(&self, object: ObjectId, committed: &Pose) -> Pose {
        let base = self
            .active
            .iter()
            .rev()
            .filter(|t| t.presents(object))
            .find_map(|t| match t.motion {
                Motion::Pose(from) => Some(from.interpolate(committed, t.eased())),
                Motion::Offset(_) => None,
            })
            .unwrap_or(*committed);

        let offset = self
            .active
            .iter()
            .filter(|t| t.presents(object))
            .filter_map(|t| match t.motion {
                Motion::Offset(offset) => Some(offset * (1.0 - t.eased())),
                Motion::Pose(_) => None,
            })
            .fold(Vec3::ZERO, |sum, offset| sum + offset);

        if offset == Vec3::ZERO {
            return base;
        }
        Pose {
            transform: pose::with_translation(
                base.transform,
                pose::translation(&base.transform) + offset,
            ),
            ..base
        }
    }

    /// Whether any transition for the object is in flight
    pub fn is_animating(&self, object: ObjectId) -> bool {
        self.active.iter().any(|t| t.object == object)
    }

    /// Remaining seconds of a transition, if still in flight
    pub fn remaining(&self, id: TransitionId) -> Option<f32> {
        self.active
            .iter()
            .find(|t| t.id == id)
            .map(|t| (t.duration - t.elapsed).max(0.0))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
