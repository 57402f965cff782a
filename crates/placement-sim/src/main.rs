//! Headless replay of a scripted scene through the placement engine
//!
//! A producer thread plays the tracking session and only sends tasks; the
//! main thread owns the engine and drains the queue.

mod scene;
mod tracker;

use anyhow::{Context, Result};
use clap::Parser;
use placement::{pose, MemoryAnchorStore, ModelCatalog, PlacementConfig, PlacementEngine};
use scene::Scene;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracker::SyntheticTracker;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "placement-sim")]
#[command(about = "Replay a scripted tracking session through the placement engine", long_about = None)]
struct Args {
    /// Scene file (TOML); the built-in living room scene when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Placement configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model catalog (TOML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override the number of frames in the scene
    #[arg(long)]
    frames: Option<usize>,

    /// Random seed for hit noise
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Hit noise along the ray, in meters
    #[arg(long, default_value = "0.02")]
    noise: f32,

    /// Real-time pacing between frames in milliseconds (0 = as fast as possible)
    #[arg(long, default_value = "0")]
    pace_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("placement={log_level},placement_sim={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => PlacementConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlacementConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => ModelCatalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => ModelCatalog::builtin(),
    };
    let mut scene = match &args.scene {
        Some(path) => Scene::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => Scene::builtin()?,
    };
    if let Some(frames) = args.frames {
        scene.frames = frames;
    }

    let mut engine = PlacementEngine::new(config, catalog, MemoryAnchorStore::new());
    let object = engine
        .spawn_object(scene.model.as_str())
        .context("Scene model is not in the catalog")?;

    tracing::info!(
        "Replaying {} frames placing '{}' (seed {}, noise {})",
        scene.frames,
        scene.model,
        args.seed,
        args.noise
    );

    let handle = engine.handle();
    let mut tracker = SyntheticTracker::new(scene, object, args.seed, args.noise);
    let pace = Duration::from_millis(args.pace_ms);
    let producer = thread::spawn(move || {
        for index in 0..tracker.frame_count() {
            for task in tracker.tasks_for_frame(index) {
                if !handle.submit(task) {
                    return;
                }
            }
            if !pace.is_zero() {
                thread::sleep(pace);
            }
        }
        handle.submit(placement::PlacementTask::EndPlacement(object));
    });

    while !producer.is_finished() {
        if engine.process_pending() > 0 {
            log_output(&engine);
        } else {
            thread::sleep(Duration::from_millis(1));
        }
    }
    producer
        .join()
        .map_err(|_| anyhow::anyhow!("Tracking producer panicked"))?;
    engine.process_pending();

    let placed = engine
        .object(object)
        .context("Placed object disappeared during replay")?;
    tracing::info!(
        "Final: position {:.3?}, alignment {}, yaw {:.4}, anchor {:?}",
        placed.position(),
        placed.current_alignment(),
        placed.yaw(),
        placed.anchor()
    );

    Ok(())
}

fn log_output<S: placement::AnchorStore>(engine: &PlacementEngine<S>) {
    for frame in engine.frame_output() {
        tracing::debug!(
            object = %frame.id,
            alignment = %frame.alignment,
            visible = frame.visible,
            animating = frame.animating,
            "presented at {:.3?}",
            pose::translation(&frame.transform)
        );
    }
}
