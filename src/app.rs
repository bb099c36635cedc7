//! Main monitoring loop.

use crate::{
    monitor::DriverMonitor,
    source::{FrameSource, LandmarkProvider},
};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Counters collected over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames read from the source
    pub frames: u64,
    /// Frames in which at least one face was detected
    pub frames_with_faces: u64,
    /// Faces rejected as malformed
    pub skipped_faces: u64,
    /// Frames that could not be read or analysed
    pub failed_frames: u64,
    /// Frames after which the drowsiness alert was on
    pub drowsy_frames: u64,
    /// Frames after which the yawn alert was on
    pub yawning_frames: u64,
}

/// Drives frames from a source through a landmark provider into the monitor
pub struct MonitorApp<S, P> {
    source: S,
    provider: P,
    monitor: DriverMonitor,
}

impl<S, P> MonitorApp<S, P>
where
    S: FrameSource,
    P: LandmarkProvider<S::Frame>,
{
    pub fn new(source: S, provider: P, monitor: DriverMonitor) -> Self {
        Self {
            source,
            provider,
            monitor,
        }
    }

    #[must_use]
    pub fn monitor(&self) -> &DriverMonitor {
        &self.monitor
    }

    /// Consume the app and return the monitor with its final state
    #[must_use]
    pub fn into_monitor(self) -> DriverMonitor {
        self.monitor
    }

    /// Run until the source ends or `max_frames` frames have been read.
    ///
    /// A frame that fails to read or analyse is logged and skipped; the loop
    /// only stops when the source reports the end of the stream.
    pub fn run(&mut self, max_frames: Option<u64>) -> RunSummary {
        info!("Starting monitoring loop on {}", self.source.describe());

        let mut summary = RunSummary::default();
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();

        loop {
            if max_frames.is_some_and(|max| summary.frames >= max) {
                info!("Frame limit reached");
                break;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("End of stream reached");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read frame: {e}");
                    summary.frames += 1;
                    summary.failed_frames += 1;
                    continue;
                }
            };
            summary.frames += 1;

            let faces = match self.provider.detect_faces(&frame) {
                Ok(faces) => faces,
                Err(e) => {
                    warn!("Landmark detection failed on frame {}: {e}", summary.frames);
                    summary.failed_frames += 1;
                    continue;
                }
            };

            if faces.is_empty() {
                debug!("No face in frame {}", summary.frames);
            } else {
                summary.frames_with_faces += 1;
            }

            let outcome = self.monitor.process_frame(&faces);
            summary.skipped_faces += outcome.skipped_faces as u64;
            if outcome.alerts.is_drowsy {
                summary.drowsy_frames += 1;
            }
            if outcome.alerts.is_yawning {
                summary.yawning_frames += 1;
            }

            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                let fps = summary.frames as f64 / start_time.elapsed().as_secs_f64();
                info!("{} frames, {fps:.1} fps, alerts: {}", summary.frames, outcome.alerts);
                last_fps_update = Instant::now();
            }
        }

        info!(
            "Monitoring finished: {} frames ({} with faces), {} failed, {} faces skipped, drowsy {} / yawning {} frames",
            summary.frames,
            summary.frames_with_faces,
            summary.failed_frames,
            summary.skipped_faces,
            summary.drowsy_frames,
            summary.yawning_frames
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        landmarks::LandmarkSet,
        source::{PrecomputedLandmarks, VecSource},
        Error, Result,
    };

    struct FailingProvider {
        calls: usize,
    }

    impl LandmarkProvider<Vec<LandmarkSet>> for FailingProvider {
        fn detect_faces(&mut self, frame: &Vec<LandmarkSet>) -> Result<Vec<LandmarkSet>> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                Err(Error::InvalidInput("landmark detector unavailable".to_string()))
            } else {
                Ok(frame.clone())
            }
        }
    }

    #[test]
    fn test_counts_frames_and_faces() {
        let frames = vec![vec![], vec![LandmarkSet::default()], vec![]];
        let monitor = DriverMonitor::new(&Config::default()).unwrap();
        let mut app = MonitorApp::new(VecSource::new(frames), PrecomputedLandmarks, monitor);

        let summary = app.run(None);
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.frames_with_faces, 1);
        assert_eq!(summary.skipped_faces, 1);
        assert_eq!(summary.failed_frames, 0);
    }

    #[test]
    fn test_provider_errors_are_not_fatal() {
        let frames = vec![Vec::new(); 6];
        let monitor = DriverMonitor::new(&Config::default()).unwrap();
        let mut app = MonitorApp::new(VecSource::new(frames), FailingProvider { calls: 0 }, monitor);

        let summary = app.run(None);
        assert_eq!(summary.frames, 6);
        assert_eq!(summary.failed_frames, 3);
    }

    #[test]
    fn test_max_frames() {
        let frames = vec![Vec::new(); 10];
        let monitor = DriverMonitor::new(&Config::default()).unwrap();
        let mut app = MonitorApp::new(VecSource::new(frames), PrecomputedLandmarks, monitor);
        assert_eq!(app.run(Some(4)).frames, 4);
    }
}
