//! Running recorded landmark sessions through the monitoring loop


use driver_monitor::{
    app::MonitorApp,
    config::Config,
    monitor::DriverMonitor,
    replay::{format_frame, ReplayLandmarks, ReplaySource},
};
use std::io::Write;
use tempfile::NamedTempFile;
use test_helpers::{alert_face, drowsy_face, yawning_face};

fn write_session(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_replay_session_summary() {
    let closed = format_frame(&[drowsy_face()]).unwrap();
    let open = format_frame(&[alert_face()]).unwrap();

    let mut lines = vec![closed; 12];
    lines.push(String::new());
    lines.push("not a frame".to_string());
    lines.extend(std::iter::repeat(open).take(5));
    let file = write_session(&lines);

    let monitor = DriverMonitor::new(&Config::default()).unwrap();
    let source = ReplaySource::open(file.path()).unwrap();
    let mut app = MonitorApp::new(source, ReplayLandmarks, monitor);
    let summary = app.run(None);

    assert_eq!(summary.frames, 19);
    assert_eq!(summary.frames_with_faces, 17);
    assert_eq!(summary.failed_frames, 1);
    assert_eq!(summary.skipped_faces, 0);
    // Frames 9-12, the empty frame and two open-eye frames still inside the window
    assert_eq!(summary.drowsy_frames, 7);
    assert_eq!(summary.yawning_frames, 0);

    assert!(!app.into_monitor().alerts().is_drowsy);
}

#[test]
fn test_replay_frame_limit() {
    let yawn = format_frame(&[yawning_face()]).unwrap();
    let file = write_session(&vec![yawn; 20]);

    let monitor = DriverMonitor::new(&Config::default()).unwrap();
    let source = ReplaySource::open(file.path()).unwrap();
    let mut app = MonitorApp::new(source, ReplayLandmarks, monitor);
    let summary = app.run(Some(5));

    assert_eq!(summary.frames, 5);
    assert_eq!(summary.yawning_frames, 2);
    assert!(app.monitor().alerts().is_yawning);
}

#[test]
fn test_replay_short_face_is_skipped() {
    let file = write_session(&["[[[1.0, 2.0], [3.0, 4.0]]]".to_string()]);

    let monitor = DriverMonitor::new(&Config::default()).unwrap();
    let source = ReplaySource::open(file.path()).unwrap();
    let mut app = MonitorApp::new(source, ReplayLandmarks, monitor);
    let summary = app.run(None);

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.frames_with_faces, 1);
    assert_eq!(summary.skipped_faces, 1);
}

#[test]
fn test_missing_replay_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ReplaySource::open(dir.path().join("missing.jsonl")).is_err());
}
