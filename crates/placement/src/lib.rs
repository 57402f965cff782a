//! Placement crate - keeps virtual objects stable on tracked surfaces
//!
//! Tracking data arrives once per frame and is noisy: ray-cast hits jitter,
//! plane estimates are refined over time, and the surface under the cursor
//! may change orientation. This crate turns that stream into steady object
//! transforms.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   PlacementEngine                        │
//! ├─────────────────────────────────────────────────────────┤
//! │  Per frame (PlacementTask::Frame)                        │
//! │  ├── PlaneHitRanker     - best surface hit for a point   │
//! │  ├── SmoothedPlacement  - damped camera distance         │
//! │  └── AlignmentStateMachine - horizontal/vertical changes │
//! ├─────────────────────────────────────────────────────────┤
//! │  Per plane event (PlacementTask::PlaneAdded/Updated)     │
//! │  └── PlaneSnapAdjuster  - ease drifting objects onto it  │
//! ├─────────────────────────────────────────────────────────┤
//! │  Support                                                 │
//! │  ├── Animator     - timed transitions, completions       │
//! │  ├── ModelCatalog - allowed alignments per model         │
//! │  └── AnchorStore  - session anchors, replaced on moves   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use placement::{
//!     Alignment, FrameUpdate, HitCandidate, HitKind, PlacementEngine, PlacementQuery, PlaneId,
//! };
//! use placement::glam::{Mat4, Vec2, Vec3};
//!
//! let mut engine = PlacementEngine::with_defaults();
//! let cup = engine.spawn_object("cup").unwrap();
//!
//! // Frames usually arrive from another thread through a handle
//! let handle = engine.handle();
//! handle.frame(FrameUpdate {
//!     camera_transform: Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0)),
//!     dt: 1.0 / 60.0,
//!     query: Some(PlacementQuery {
//!         object: cup,
//!         screen_point: Vec2::new(0.5, 0.5),
//!         hits: vec![HitCandidate::on_plane(
//!             HitKind::ExistingGeometryPlane,
//!             PlaneId(1),
//!             Alignment::Horizontal,
//!             2.0,
//!             Mat4::from_translation(Vec3::new(0.0, 0.0, -1.2)),
//!         )],
//!         smoothing: true,
//!         infinite_planes: false,
//!     }),
//! });
//!
//! engine.process_pending();
//! assert!(engine.object(cup).unwrap().is_placed());
//! ```

mod alignment;
mod alignment_state;
mod anchor;
mod animation;
mod catalog;
mod config;
mod engine;
mod error;
mod hit;
mod object;
mod plane;
mod smoothing;
mod snap;
mod task;

pub mod pose;

pub use alignment::{Alignment, AlignmentSet};
pub use alignment_state::{AlignmentOutcome, AlignmentStateMachine, AlignmentTransition};
pub use anchor::{AnchorId, AnchorStore, MemoryAnchorStore};
pub use animation::{Animator, Completion, Easing, TransitionId, TransitionKind};
pub use catalog::{ModelCatalog, ModelEntry};
pub use config::{
    AlignmentConfig, AnchorConfig, PlacementConfig, RankingConfig, SmoothingConfig, SnapConfig,
};
pub use engine::{ObjectFrame, PlacementEngine};
pub use error::{Error, Result};
pub use hit::{HitCandidate, HitKind, PlaneHitRanker};
pub use object::{ModelKind, ObjectId, PlacedObject};
pub use plane::{PlaneEvent, PlaneId, PlaneSurface};
pub use pose::Pose;
pub use smoothing::SmoothedPlacement;
pub use snap::{PlaneSnapAdjuster, Snap};
pub use task::{FrameUpdate, PlacementHandle, PlacementQuery, PlacementTask, TrackingState};

// Re-export glam for convenience
pub use glam;
