//! Work items for the placement queue
//!
//! Frame producers never touch placement state. They describe what happened
//! as [`PlacementTask`]s and send them through a [`PlacementHandle`]; the
//! thread owning the [`PlacementEngine`](crate::PlacementEngine) applies them
//! in the order they were sent.

use crate::anchor::AnchorId;
use crate::animation::Completion;
use crate::hit::HitCandidate;
use crate::object::ObjectId;
use crate::plane::PlaneEvent;
use glam::{Mat4, Vec2};
use std::sync::mpsc::Sender;

/// Tracking quality reported by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    Normal,
    /// Tracking degraded; placement pauses
    Limited,
    /// Tracking lost or interrupted; content is hidden
    NotAvailable,
}

/// Hits gathered for an object being positioned this frame
#[derive(Debug, Clone)]
pub struct PlacementQuery {
    pub object: ObjectId,
    /// Screen point the hits were cast through
    pub screen_point: Vec2,
    pub hits: Vec<HitCandidate>,
    /// Average the camera distance over recent frames
    pub smoothing: bool,
    /// Accept detected planes extended beyond their geometry
    pub infinite_planes: bool,
}

/// One tracking frame
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub camera_transform: Mat4,
    /// Seconds since the previous frame
    pub dt: f32,
    pub query: Option<PlacementQuery>,
}

/// A unit of work applied on the placement queue
#[derive(Debug, Clone)]
pub enum PlacementTask {
    Frame(FrameUpdate),
    PlaneAdded(PlaneEvent),
    PlaneUpdated(PlaneEvent),
    /// The session refined an anchor's transform
    AnchorUpdated { anchor: AnchorId, transform: Mat4 },
    /// Add to the object's yaw (rotation gesture)
    Rotate { object: ObjectId, delta: f32 },
    /// The user let go of the object
    EndPlacement(ObjectId),
    /// Placement restarts; forget smoothing history
    ResetSmoothing(ObjectId),
    Remove(ObjectId),
    RemoveAll,
    TrackingChanged(TrackingState),
    /// Delivered by the engine itself when a transition finishes
    TransitionFinished(Completion),
}

/// Cloneable sender for placement tasks
#[derive(Debug, Clone)]
pub struct PlacementHandle {
    sender: Sender<PlacementTask>,
}

impl PlacementHandle {
    pub(crate) fn new(sender: Sender<PlacementTask>) -> Self {
        Self { sender }
    }

    /// Enqueue a task; returns `false` once the engine is gone
    pub fn submit(&self, task: PlacementTask) -> bool {
        self.sender.send(task).is_ok()
    }

    pub fn frame(&self, update: FrameUpdate) -> bool {
        self.submit(PlacementTask::Frame(update))
    }

    pub fn plane_added(&self, event: PlaneEvent) -> bool {
        self.submit(PlacementTask::PlaneAdded(event))
    }

    pub fn plane_updated(&self, event: PlaneEvent) -> bool {
        self.submit(PlacementTask::PlaneUpdated(event))
    }

    pub fn tracking_changed(&self, state: TrackingState) -> bool {
        self.submit(PlacementTask::TrackingChanged(state))
    }
}
