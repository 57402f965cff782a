//! Benchmark for hit ranking and smoothed placement
//!
//! Measures per-frame cost of choosing a surface among a realistic number
//! of candidates and of the smoothing step that follows.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use glam::{Mat4, Vec3};
use placement::{
    Alignment, AlignmentSet, HitCandidate, HitKind, ModelKind, ObjectId, PlacedObject,
    PlaneHitRanker, PlaneId, SmoothedPlacement,
};

/// Candidates for one query point: many infinite planes, estimates last
fn create_candidates(count: usize) -> Vec<HitCandidate> {
    let mut candidates = Vec::with_capacity(count + 2);
    for i in 0..count {
        let y = i as f32 * 0.25;
        candidates.push(HitCandidate::on_plane(
            HitKind::ExistingInfinitePlane,
            PlaneId(i as u64),
            Alignment::Horizontal,
            1.0 + y,
            Mat4::from_translation(Vec3::new(0.0, y, -2.0)),
        ));
    }
    candidates.push(HitCandidate::estimated(
        HitKind::EstimatedHorizontal,
        2.0,
        Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)),
    ));
    candidates.push(HitCandidate::estimated(
        HitKind::EstimatedVertical,
        1.5,
        Mat4::from_translation(Vec3::new(0.0, 1.0, -1.5)),
    ));
    candidates
}

fn bench_select_best_hit(c: &mut Criterion) {
    let ranker = PlaneHitRanker::default();
    let candidates = create_candidates(32);

    c.bench_function("select_best_hit_fallthrough", |b| {
        b.iter(|| {
            // Height far from every plane forces a full scan
            ranker.select_best_hit(
                black_box(&candidates),
                true,
                Some(100.0),
                AlignmentSet::BOTH,
            )
        })
    });
}

fn bench_compute_target(c: &mut Criterion) {
    let smoother = SmoothedPlacement::default();
    let mut object = PlacedObject::new(ObjectId(1), ModelKind::new("cup"), AlignmentSet::BOTH);
    let camera = Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0));
    let hit = Mat4::from_translation(Vec3::new(0.3, 0.0, -2.0));

    c.bench_function("compute_target_smoothed", |b| {
        b.iter(|| smoother.compute_target(black_box(&camera), black_box(&hit), &mut object, true))
    });
}

criterion_group!(benches, bench_select_best_hit, bench_compute_target);
criterion_main!(benches);
