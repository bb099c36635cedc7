//! Benchmarks for the per-frame monitoring pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use driver_monitor::{
    config::Config,
    constants::NUM_FACIAL_LANDMARKS,
    features::FaceFeatures,
    landmarks::{LandmarkSet, Point2},
    monitor::{DriverMonitor, FrameMonitor},
};

/// Random 68-point face inside a 200x200 box
fn random_face() -> LandmarkSet {
    (0..NUM_FACIAL_LANDMARKS)
        .map(|_| Point2::new(200.0 * rand::random::<f64>(), 200.0 * rand::random::<f64>()))
        .collect::<Vec<_>>()
        .into()
}

fn benchmark_features(c: &mut Criterion) {
    let face = random_face();
    c.bench_function("extract_features", |b| {
        b.iter(|| black_box(FaceFeatures::extract(black_box(&face))));
    });
}

fn benchmark_frame_monitor(c: &mut Criterion) {
    let faces: Vec<LandmarkSet> = (0..100).map(|_| random_face()).collect();
    let mut monitor = FrameMonitor::default();

    c.bench_function("frame_monitor_sequence_100", |b| {
        b.iter(|| {
            monitor.reset();
            for face in &faces {
                let _ = black_box(monitor.update(black_box(face)));
            }
        });
    });
}

fn benchmark_driver_monitor(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_frame");
    let mut monitor = DriverMonitor::new(&Config::default()).expect("default config is valid");

    for face_count in [0usize, 1, 4] {
        let faces: Vec<LandmarkSet> = (0..face_count).map(|_| random_face()).collect();
        group.bench_with_input(BenchmarkId::new("faces", face_count), &faces, |b, faces| {
            b.iter(|| black_box(monitor.process_frame(black_box(faces))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_features,
    benchmark_frame_monitor,
    benchmark_driver_monitor
);
criterion_main!(benches);
