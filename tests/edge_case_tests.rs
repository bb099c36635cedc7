//! Edge case tests for smoothing, hysteresis and malformed input


use driver_monitor::{
    config::Config,
    features::{combined_eye_aspect_ratio, eye_aspect_ratio, FaceFeatures},
    filters::{moving_average::MovingAverageFilter, SignalFilter},
    hysteresis::{DrowsinessDetector, YawnDetector},
    landmarks::Point2,
    monitor::DriverMonitor,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_helpers::{drowsy_face, synthetic_face, truncated_face};

#[test]
fn test_counter_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(7);

    for (limit, increment, decrement) in [(17, 2, 1), (7, 2, 1), (1, 1, 1), (10, 3, 2), (5, 9, 4)] {
        let mut detector = DrowsinessDetector::new(0.27, limit, increment, decrement);
        for _ in 0..5000 {
            let value = rng.gen_range(0.0..0.5);
            let active = detector.update(value);
            assert!(detector.count() <= limit);
            assert_eq!(active, detector.count() >= limit);
        }
    }
}

#[test]
fn test_long_runs_never_overflow() {
    let mut drowsiness = DrowsinessDetector::new(0.27, 17, 2, 1);
    let mut yawn = YawnDetector::new(20.0, 7, 2, 1);
    for _ in 0..100_000 {
        drowsiness.update(0.0);
        yawn.update(f64::MAX);
    }
    assert_eq!(drowsiness.count(), 17);
    assert_eq!(yawn.count(), 7);

    for _ in 0..100_000 {
        drowsiness.update(1.0);
        yawn.update(0.0);
    }
    assert_eq!(drowsiness.count(), 0);
    assert_eq!(yawn.count(), 0);
}

#[test]
fn test_noisy_signal_bursts() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut detector = YawnDetector::new(20.0, 7, 2, 1);

    // Mostly quiet with rare spikes: at most one spike in any three frames never reaches 7
    let mut since_spike = 3;
    for _ in 0..2000 {
        let spike = since_spike >= 2 && rng.gen_bool(0.2);
        since_spike = if spike { 0 } else { since_spike + 1 };
        detector.update(if spike { 40.0 } else { 5.0 });
        assert!(!detector.is_active());
    }
}

#[test]
fn test_window_keeps_latest_samples() {
    let mut filter = MovingAverageFilter::new(5);
    for i in 1..=12 {
        filter.apply(f64::from(i));
    }
    assert_eq!(filter.len(), 5);
    assert_eq!(filter.samples().collect::<Vec<_>>(), vec![8.0, 9.0, 10.0, 11.0, 12.0]);
    assert!((filter.value() - 10.0).abs() < 1e-12);
}

#[test]
fn test_empty_window_is_zero() {
    let mut filter = MovingAverageFilter::new(5);
    assert!(filter.is_empty());
    assert_eq!(filter.value(), 0.0);

    filter.apply(3.0);
    filter.reset();
    assert_eq!(filter.value(), 0.0);
}

#[test]
fn test_combined_ear_is_minimum() {
    let open = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, -5.0),
        Point2::new(20.0, -5.0),
        Point2::new(30.0, 0.0),
        Point2::new(20.0, 5.0),
        Point2::new(10.0, 5.0),
    ];
    let closed = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, -1.0),
        Point2::new(20.0, -1.0),
        Point2::new(30.0, 0.0),
        Point2::new(20.0, 1.0),
        Point2::new(10.0, 1.0),
    ];

    let open_ear = eye_aspect_ratio(&open).unwrap();
    let closed_ear = eye_aspect_ratio(&closed).unwrap();
    assert!(closed_ear < open_ear);
    assert_eq!(combined_eye_aspect_ratio(&open, &closed).unwrap(), closed_ear);
    assert_eq!(combined_eye_aspect_ratio(&closed, &open).unwrap(), closed_ear);
}

#[test]
fn test_degenerate_eye_stays_finite() {
    let point = Point2::new(5.0, 5.0);
    let ear = eye_aspect_ratio(&[point; 6]).unwrap();
    assert_eq!(ear, 0.0);
}

#[test]
fn test_non_finite_landmarks_rejected() {
    let mut points = drowsy_face().points().to_vec();
    points[43] = Point2::new(f64::NAN, 100.0);
    assert!(FaceFeatures::extract(&points.into()).is_err());

    let mut points = drowsy_face().points().to_vec();
    points[66] = Point2::new(140.0, f64::INFINITY);
    assert!(FaceFeatures::extract(&points.into()).is_err());
}

#[test]
fn test_malformed_face_is_skipped() {
    let mut monitor = DriverMonitor::new(&Config::default()).unwrap();
    let face = drowsy_face();
    for _ in 0..5 {
        monitor.process_frame(std::slice::from_ref(&face));
    }
    let count = monitor.face(0).unwrap().drowsiness().count();

    let outcome = monitor.process_frame(&[truncated_face()]);
    assert_eq!(outcome.skipped_faces, 1);
    assert!(outcome.reports.is_empty());
    assert_eq!(monitor.face(0).unwrap().drowsiness().count(), count);

    // The next good frame continues from where the slot was
    monitor.process_frame(std::slice::from_ref(&face));
    assert_eq!(monitor.face(0).unwrap().drowsiness().count(), count + 2);
}

#[test]
fn test_malformed_face_does_not_block_others() {
    let mut monitor = DriverMonitor::new(&Config::default()).unwrap();
    let faces = [truncated_face(), synthetic_face(0.10, 5.0)];
    let mut outcome = monitor.process_frame(&faces);
    for _ in 1..9 {
        outcome = monitor.process_frame(&faces);
    }
    assert_eq!(outcome.skipped_faces, 1);
    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].0, 1);
    assert!(monitor.face_alerts(1).unwrap().is_drowsy);
    assert!(!monitor.alerts().is_drowsy);
}

#[test]
fn test_extra_faces_ignored() {
    let mut config = Config::default();
    config.face_detection.max_faces = 2;
    let mut monitor = DriverMonitor::new(&config).unwrap();

    let face = drowsy_face();
    let outcome = monitor.process_frame(&[face.clone(), face.clone(), face]);
    assert_eq!(outcome.ignored_faces, 1);
    assert_eq!(outcome.reports.len(), 2);
    assert!(monitor.face(2).is_none());
}
