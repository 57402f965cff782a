//! Placement engine: owns placed objects and applies queued tasks
//!
//! All object state is mutated here, on the thread that owns the engine.
//! Producers hold [`PlacementHandle`]s and only enqueue work; transition
//! completions are fed back through the same queue, so the busy flag of an
//! object is checked and set by one task at a time.

use crate::alignment::Alignment;
use crate::alignment_state::{AlignmentOutcome, AlignmentStateMachine};
use crate::anchor::{AnchorId, AnchorStore, MemoryAnchorStore};
use crate::animation::{Animator, Completion, Easing, TransitionKind};
use crate::catalog::ModelCatalog;
use crate::config::PlacementConfig;
use crate::error::{Error, Result};
use crate::hit::PlaneHitRanker;
use crate::object::{ModelKind, ObjectId, PlacedObject};
use crate::plane::PlaneEvent;
use crate::pose;
use crate::smoothing::SmoothedPlacement;
use crate::snap::PlaneSnapAdjuster;
use crate::task::{FrameUpdate, PlacementHandle, PlacementQuery, PlacementTask, TrackingState};
use glam::Mat4;
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, info, trace, warn};

/// Per-object output for the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFrame {
    pub id: ObjectId,
    pub model: ModelKind,
    /// Presented world transform of the object's content
    pub transform: Mat4,
    pub alignment: Alignment,
    pub visible: bool,
    pub animating: bool,
}

/// Orchestrates ranking, smoothing, alignment and snapping for all objects
pub struct PlacementEngine<S: AnchorStore = MemoryAnchorStore> {
    config: PlacementConfig,
    catalog: ModelCatalog,
    objects: BTreeMap<ObjectId, PlacedObject>,

    smoother: SmoothedPlacement,
    alignment: AlignmentStateMachine,
    ranker: PlaneHitRanker,
    snapper: PlaneSnapAdjuster,
    animator: Animator,

    anchors: S,
    tracking: TrackingState,

    sender: Sender<PlacementTask>,
    receiver: Receiver<PlacementTask>,
    next_object: u64,
}

impl PlacementEngine<MemoryAnchorStore> {
    /// Engine with default configuration, the built-in catalog and an
    /// in-memory anchor store
    pub fn with_defaults() -> Self {
        Self::new(
            PlacementConfig::default(),
            ModelCatalog::builtin(),
            MemoryAnchorStore::new(),
        )
    }
}

impl<S: AnchorStore> PlacementEngine<S> {
    pub fn new(config: PlacementConfig, catalog: ModelCatalog, anchors: S) -> Self {
        let (sender, receiver) = channel();
        Self {
            smoother: SmoothedPlacement::new(&config.smoothing),
            alignment: AlignmentStateMachine::new(&config.alignment),
            ranker: PlaneHitRanker::new(&config.ranking),
            snapper: PlaneSnapAdjuster::new(&config.snap),
            animator: Animator::new(),
            config,
            catalog,
            objects: BTreeMap::new(),
            anchors,
            tracking: TrackingState::Normal,
            sender,
            receiver,
            next_object: 0,
        }
    }

    /// Sender for producers on other threads
    pub fn handle(&self) -> PlacementHandle {
        PlacementHandle::new(self.sender.clone())
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn anchors(&self) -> &S {
        &self.anchors
    }

    pub fn tracking(&self) -> TrackingState {
        self.tracking
    }

    /// Models offered for a surface of the given alignment
    pub fn placeable_models(&self, surface: Option<Alignment>) -> Vec<ModelKind> {
        self.catalog.placeable_on(surface).cloned().collect()
    }

    /// Create a new, not yet placed object
    pub fn spawn_object(&mut self, model: impl Into<ModelKind>) -> Result<ObjectId> {
        let model = model.into();
        let allowed = self.catalog.allowed_alignments(&model)?;

        self.next_object += 1;
        let id = ObjectId(self.next_object);
        self.objects
            .insert(id, PlacedObject::new(id, model.clone(), allowed));

        info!(object = %id, %model, "object created");
        Ok(id)
    }

    /// Delete an object and release its anchor
    pub fn remove_object(&mut self, id: ObjectId) -> Result<PlacedObject> {
        let object = self.objects.remove(&id).ok_or(Error::ObjectNotFound(id))?;
        if let Some(anchor) = object.anchor {
            self.anchors.remove_anchor(anchor);
        }
        info!(object = %id, "object removed");
        Ok(object)
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_animating(&self, id: ObjectId) -> bool {
        self.animator.is_animating(id)
    }

    /// Apply every queued task in submission order
    ///
    /// Completions produced while draining are queued behind the tasks
    /// already waiting and applied in the same call.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(task) = self.receiver.try_recv() {
            self.apply(task);
            processed += 1;
        }
        processed
    }

    /// Apply one task immediately
    pub fn apply(&mut self, task: PlacementTask) {
        match task {
            PlacementTask::Frame(update) => self.frame(update),
            PlacementTask::PlaneAdded(event) | PlacementTask::PlaneUpdated(event) => {
                self.plane_changed(&event)
            }
            PlacementTask::AnchorUpdated { anchor, transform } => {
                self.anchor_updated(anchor, &transform)
            }
            PlacementTask::Rotate { object, delta } => match self.objects.get_mut(&object) {
                Some(obj) => obj.set_yaw(obj.yaw() + delta),
                None => warn!(%object, "rotate for unknown object"),
            },
            PlacementTask::EndPlacement(object) => {
                self.refresh_anchor(object);
            }
            PlacementTask::ResetSmoothing(object) => match self.objects.get_mut(&object) {
                Some(obj) => obj.reset_smoothing(),
                None => warn!(%object, "reset for unknown object"),
            },
            PlacementTask::Remove(object) => {
                if let Err(err) = self.remove_object(object) {
                    warn!("{err}");
                }
            }
            PlacementTask::RemoveAll => {
                let ids: Vec<_> = self.objects.keys().rev().copied().collect();
                for id in ids {
                    if let Err(err) = self.remove_object(id) {
                        warn!("{err}");
                    }
                }
            }
            PlacementTask::TrackingChanged(state) => {
                if state != self.tracking {
                    info!(?state, "tracking state changed");
                }
                self.tracking = state;
            }
            PlacementTask::TransitionFinished(completion) => self.transition_finished(completion),
        }
    }

    /// Presented transforms for the renderer
    pub fn frame_output(&self) -> Vec<ObjectFrame> {
        let visible = self.tracking != TrackingState::NotAvailable;
        self.objects
            .values()
            .map(|obj| ObjectFrame {
                id: obj.id(),
                model: obj.model().clone(),
                transform: self
                    .animator
                    .presented(obj.id(), &obj.pose())
                    .world_transform(),
                alignment: obj.current_alignment(),
                visible: visible && obj.is_placed(),
                animating: self.animator.is_animating(obj.id()),
            })
            .collect()
    }

    fn frame(&mut self, update: FrameUpdate) {
        for completion in self.animator.advance(update.dt) {
            // Receiver lives in self, so the send cannot fail
            let _ = self
                .sender
                .send(PlacementTask::TransitionFinished(completion));
        }

        let Some(query) = update.query else {
            return;
        };
        if self.tracking != TrackingState::Normal {
            trace!(object = %query.object, "placement paused while tracking is degraded");
            return;
        }
        self.place(&update.camera_transform, &query);
    }

    fn place(&mut self, camera_transform: &Mat4, query: &PlacementQuery) {
        let Some(object) = self.objects.get_mut(&query.object) else {
            warn!(object = %query.object, "placement query for unknown object");
            return;
        };

        let height = object.is_placed().then(|| object.position().y);
        let Some(hit) = self.ranker.select_best_hit(
            &query.hits,
            query.infinite_planes,
            height,
            object.allowed_alignments(),
        ) else {
            trace!(object = %query.object, "no placement surface this frame");
            return;
        };

        let Some(target) =
            self.smoother
                .compute_target(camera_transform, &hit.world_transform, object, query.smoothing)
        else {
            trace!(object = %query.object, "hit at camera position, frame skipped");
            return;
        };

        object.set_position(target);
        object.mark_placed();

        // Vertical-only models may rest on a floor estimate without turning
        let alignment = hit.alignment();
        if !object.allowed_alignments().contains(alignment) {
            trace!(object = %query.object, %alignment, "surface alignment not allowed, kept current");
            return;
        }

        let outcome = self
            .alignment
            .request(object, alignment, &hit.world_transform, true);
        if let AlignmentOutcome::Started(transition) = outcome {
            self.animator.schedule(
                query.object,
                TransitionKind::Alignment,
                transition.from,
                transition.duration,
                Easing::Linear,
            );
        }
    }

    fn plane_changed(&mut self, event: &PlaneEvent) {
        let mut snapped = Vec::new();
        for (id, object) in self.objects.iter_mut() {
            if !object.is_placed() {
                continue;
            }
            let Some(snap) = self.snapper.try_snap(
                object,
                &event.surface,
                &event.node_transform,
                &self.alignment,
            ) else {
                continue;
            };

            self.animator.schedule_offset(
                *id,
                TransitionKind::Snap,
                snap.offset,
                snap.duration,
                Easing::EaseInOut,
            );
            if let AlignmentOutcome::Started(transition) = snap.alignment {
                self.animator.schedule(
                    *id,
                    TransitionKind::Alignment,
                    transition.from,
                    transition.duration,
                    Easing::Linear,
                );
            }
            snapped.push(*id);
        }

        for id in snapped {
            self.refresh_anchor(id);
        }
    }

    fn anchor_updated(&mut self, anchor: AnchorId, transform: &Mat4) {
        let Some(object) = self
            .objects
            .values_mut()
            .find(|obj| obj.anchor == Some(anchor))
        else {
            return;
        };

        let position = pose::translation(transform);
        object.set_position(position);
        object.anchored_at = Some(position);
        trace!(object = %object.id(), %anchor, "position follows anchor");
    }

    /// Replace the object's anchor if it has none or has moved away from it
    fn refresh_anchor(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.objects.get_mut(&id) else {
            return false;
        };
        if !object.is_placed() {
            return false;
        }

        let position = object.position();
        let moved = object
            .anchored_at
            .map_or(true, |at| at.distance(position) > self.config.anchors.refresh_distance);
        if object.anchor.is_some() && !moved {
            return false;
        }

        if let Some(old) = object.anchor.take() {
            self.anchors.remove_anchor(old);
        }
        let anchor = self.anchors.add_anchor(object.transform());
        object.anchor = Some(anchor);
        object.anchored_at = Some(position);

        debug!(object = %id, %anchor, "anchor replaced");
        true
    }

    fn transition_finished(&mut self, completion: Completion) {
        match (completion.kind, self.objects.get_mut(&completion.object)) {
            (TransitionKind::Alignment, Some(object)) => self.alignment.complete(object),
            (_, None) => {
                trace!(object = %completion.object, "transition finished for removed object")
            }
            (TransitionKind::Snap, Some(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::{HitCandidate, HitKind};
    use crate::plane::{PlaneId, PlaneSurface};
    use glam::{Vec2, Vec3};

    fn hit_on_floor(position: Vec3) -> HitCandidate {
        HitCandidate::on_plane(
            HitKind::ExistingGeometryPlane,
            PlaneId(1),
            Alignment::Horizontal,
            position.length(),
            Mat4::from_translation(position),
        )
    }

    fn frame(object: ObjectId, hits: Vec<HitCandidate>) -> FrameUpdate {
        FrameUpdate {
            camera_transform: Mat4::IDENTITY,
            dt: 1.0 / 60.0,
            query: Some(PlacementQuery {
                object,
                screen_point: Vec2::new(0.5, 0.5),
                hits,
                smoothing: true,
                infinite_planes: false,
            }),
        }
    }

    #[test]
    fn test_spawn_unknown_model() {
        let mut engine = PlacementEngine::with_defaults();
        assert!(matches!(
            engine.spawn_object("teapot"),
            Err(Error::UnknownModel(_))
        ));
    }

    #[test]
    fn test_frame_places_object() {
        let mut engine = PlacementEngine::with_defaults();
        let id = engine.spawn_object("cup").unwrap();

        engine.apply(PlacementTask::Frame(frame(
            id,
            vec![hit_on_floor(Vec3::new(0.0, -1.0, -2.0))],
        )));

        let obj = engine.object(id).unwrap();
        assert!(obj.is_placed());
        assert!(obj
            .position()
            .abs_diff_eq(Vec3::new(0.0, -1.0, -2.0), 1e-5));
    }

    #[test]
    fn test_vertical_model_on_floor_estimate_keeps_alignment() {
        let mut engine = PlacementEngine::with_defaults();
        let id = engine.spawn_object("painting").unwrap();

        let estimate = HitCandidate::estimated(
            HitKind::EstimatedHorizontal,
            2.0,
            Mat4::from_translation(Vec3::new(0.0, -1.0, -1.0)),
        );
        engine.apply(PlacementTask::Frame(frame(id, vec![estimate])));

        let obj = engine.object(id).unwrap();
        assert!(obj.is_placed());
        assert_eq!(obj.current_alignment(), Alignment::Vertical);
        assert!(obj.position().abs_diff_eq(Vec3::new(0.0, -1.0, -1.0), 1e-5));
    }

    #[test]
    fn test_no_hit_leaves_object_unchanged() {
        let mut engine = PlacementEngine::with_defaults();
        let id = engine.spawn_object("cup").unwrap();

        engine.apply(PlacementTask::Frame(frame(id, vec![])));

        assert!(!engine.object(id).unwrap().is_placed());
    }

    #[test]
    fn test_remove_releases_anchor() {
        let mut engine = PlacementEngine::with_defaults();
        let id = engine.spawn_object("cup").unwrap();
        engine.apply(PlacementTask::Frame(frame(
            id,
            vec![hit_on_floor(Vec3::new(0.0, -1.0, -1.0))],
        )));
        engine.apply(PlacementTask::EndPlacement(id));
        assert_eq!(engine.anchors().len(), 1);

        engine.remove_object(id).unwrap();
        assert!(engine.anchors().is_empty());
        assert!(matches!(
            engine.remove_object(id),
            Err(Error::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_placeable_models() {
        let engine = PlacementEngine::with_defaults();
        let models = engine.placeable_models(Some(Alignment::Vertical));
        assert!(models.contains(&ModelKind::new("painting")));
        assert!(!models.contains(&ModelKind::new("cup")));
    }

    #[test]
    fn test_snap_skips_unplaced_objects() {
        let mut engine = PlacementEngine::with_defaults();
        let id = engine.spawn_object("cup").unwrap();

        let surface = PlaneSurface {
            id: PlaneId(4),
            center: Vec3::ZERO,
            extent: Vec2::new(4.0, 4.0),
            alignment: Alignment::Horizontal,
            world_transform: Mat4::from_translation(Vec3::new(0.0, -0.02, 0.0)),
        };
        engine.apply(PlacementTask::PlaneAdded(PlaneEvent::new(surface)));

        assert_eq!(engine.object(id).unwrap().position(), Vec3::ZERO);
    }
}
