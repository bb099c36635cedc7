//! Per-frame orchestration: landmarks → features → smoothed features → alerts.

use crate::{
    alert::{AlertBoard, AlertState},
    config::{Config, DrowsinessConfig, YawnConfig},
    constants::DEFAULT_SMOOTHING_WINDOW,
    features::FaceFeatures,
    filters::{create_filter, moving_average::MovingAverageFilter, SignalFilter},
    hysteresis::{DrowsinessDetector, YawnDetector},
    landmarks::LandmarkSet,
    Result,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Measurements and state after one face update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Combined eye aspect ratio of this frame
    pub ear: f64,
    /// Lip distance of this frame
    pub lip_distance: f64,
    /// Windowed EAR fed to the drowsiness state machine
    pub smoothed_ear: f64,
    /// Windowed lip distance fed to the yawn state machine
    pub smoothed_lip_distance: f64,
    /// Drowsiness counter after the update
    pub eye_count: u32,
    /// Yawn counter after the update
    pub yawn_count: u32,
    /// Alert flags after the update
    pub alerts: AlertState,
}

/// Alert pipeline for a single face
pub struct FrameMonitor {
    ear_filter: Box<dyn SignalFilter>,
    lip_filter: Box<dyn SignalFilter>,
    drowsiness: DrowsinessDetector,
    yawn: YawnDetector,
    alerts: AlertState,
}

impl FrameMonitor {
    /// Create a monitor from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the signal or smoothing settings are invalid
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            ear_filter: create_filter(&config.smoothing.method, config.smoothing.window_size)?,
            lip_filter: create_filter(&config.smoothing.method, config.smoothing.window_size)?,
            drowsiness: DrowsinessDetector::from_config(&config.drowsiness)?,
            yawn: YawnDetector::from_config(&config.yawn)?,
            alerts: AlertState::default(),
        })
    }

    /// Feed one face. Features are extracted before any state changes, so a
    /// malformed face leaves the monitor exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the landmark set cannot produce both signals
    pub fn update(&mut self, landmarks: &LandmarkSet) -> Result<FrameReport> {
        let features = FaceFeatures::extract(landmarks)?;

        let smoothed_ear = self.ear_filter.apply(features.ear);
        let smoothed_lip_distance = self.lip_filter.apply(features.lip_distance);

        self.alerts = AlertState {
            is_drowsy: self.drowsiness.update(smoothed_ear),
            is_yawning: self.yawn.update(smoothed_lip_distance),
        };

        Ok(FrameReport {
            ear: features.ear,
            lip_distance: features.lip_distance,
            smoothed_ear,
            smoothed_lip_distance,
            eye_count: self.drowsiness.count(),
            yawn_count: self.yawn.count(),
            alerts: self.alerts,
        })
    }

    /// Latest alert flags for this face
    #[must_use]
    pub fn alerts(&self) -> AlertState {
        self.alerts
    }

    #[must_use]
    pub fn drowsiness(&self) -> &DrowsinessDetector {
        &self.drowsiness
    }

    #[must_use]
    pub fn yawn(&self) -> &YawnDetector {
        &self.yawn
    }

    /// Clear windows, counters and alerts
    pub fn reset(&mut self) {
        self.ear_filter.reset();
        self.lip_filter.reset();
        self.drowsiness.reset();
        self.yawn.reset();
        self.alerts = AlertState::default();
    }
}

impl Default for FrameMonitor {
    fn default() -> Self {
        let drowsiness = DrowsinessConfig::default();
        let yawn = YawnConfig::default();
        Self {
            ear_filter: Box::new(MovingAverageFilter::new(DEFAULT_SMOOTHING_WINDOW)),
            lip_filter: Box::new(MovingAverageFilter::new(DEFAULT_SMOOTHING_WINDOW)),
            drowsiness: DrowsinessDetector::new(
                drowsiness.threshold,
                drowsiness.consec_frames,
                drowsiness.increment,
                drowsiness.decrement,
            ),
            yawn: YawnDetector::new(yawn.threshold, yawn.consec_frames, yawn.increment, yawn.decrement),
            alerts: AlertState::default(),
        }
    }
}

/// Result of processing every face in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Reports for faces that were updated, keyed by detection slot
    pub reports: Vec<(usize, FrameReport)>,
    /// Faces rejected as malformed this frame
    pub skipped_faces: usize,
    /// Faces beyond `max_faces` that were not monitored
    pub ignored_faces: usize,
    /// Published state of the primary face after this frame
    pub alerts: AlertState,
}

/// Monitors every detected face and publishes the primary face's alerts
///
/// Detection slot `i` (the `i`-th face returned by the provider) is always
/// served by the same [`FrameMonitor`]. Slot 0 is the primary driver.
pub struct DriverMonitor {
    faces: Vec<FrameMonitor>,
    board: Arc<AlertBoard>,
    published: AlertState,
}

impl DriverMonitor {
    /// Create a monitor bank with one pipeline per face slot
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let faces = (0..config.face_detection.max_faces)
            .map(|_| FrameMonitor::new(config))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Driver monitor ready: EAR < {} for {}, lip distance > {} for {}, {} window of {}, {} face slots",
            config.drowsiness.threshold,
            config.drowsiness.consec_frames,
            config.yawn.threshold,
            config.yawn.consec_frames,
            config.smoothing.method,
            config.smoothing.window_size,
            faces.len()
        );

        Ok(Self {
            faces,
            board: Arc::new(AlertBoard::new()),
            published: AlertState::default(),
        })
    }

    /// Process all faces detected in one frame.
    ///
    /// With no faces nothing changes, so alerts survive brief detection loss.
    /// Malformed faces are skipped without touching their slot.
    pub fn process_frame(&mut self, faces: &[LandmarkSet]) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            alerts: self.published,
            ..FrameOutcome::default()
        };
        if faces.is_empty() {
            return outcome;
        }

        outcome.ignored_faces = faces.len().saturating_sub(self.faces.len());
        if outcome.ignored_faces > 0 {
            debug!("Ignoring {} faces beyond the monitored slots", outcome.ignored_faces);
        }

        for (slot, (monitor, landmarks)) in self.faces.iter_mut().zip(faces).enumerate() {
            match monitor.update(landmarks) {
                Ok(report) => {
                    debug!(
                        "face {slot}: EAR {:.3} (avg {:.3}, count {}), LIP {:.2} (avg {:.2}, count {})",
                        report.ear,
                        report.smoothed_ear,
                        report.eye_count,
                        report.lip_distance,
                        report.smoothed_lip_distance,
                        report.yawn_count
                    );
                    outcome.reports.push((slot, report));
                }
                Err(e) => {
                    warn!("Skipping face {slot}: {e}");
                    outcome.skipped_faces += 1;
                }
            }
        }

        self.publish();
        outcome.alerts = self.published;
        outcome
    }

    fn publish(&mut self) {
        let Some(primary) = self.faces.first() else {
            return;
        };
        let state = primary.alerts();

        if state.is_drowsy != self.published.is_drowsy {
            if state.is_drowsy {
                warn!("DROWSINESS ALERT raised");
            } else {
                info!("Drowsiness alert cleared");
            }
        }
        if state.is_yawning != self.published.is_yawning {
            if state.is_yawning {
                warn!("YAWN ALERT raised");
            } else {
                info!("Yawn alert cleared");
            }
        }

        self.published = state;
        self.board.publish(state);
    }

    /// Alert state of the primary face
    #[must_use]
    pub fn alerts(&self) -> AlertState {
        self.published
    }

    /// Alert state of face slot `slot`, if monitored
    #[must_use]
    pub fn face_alerts(&self, slot: usize) -> Option<AlertState> {
        self.faces.get(slot).map(FrameMonitor::alerts)
    }

    /// Pipeline for face slot `slot`
    #[must_use]
    pub fn face(&self, slot: usize) -> Option<&FrameMonitor> {
        self.faces.get(slot)
    }

    /// Handle for readers on other threads
    #[must_use]
    pub fn alert_board(&self) -> Arc<AlertBoard> {
        Arc::clone(&self.board)
    }

    /// Clear every slot and publish the quiet state
    pub fn reset(&mut self) {
        self.faces.iter_mut().for_each(FrameMonitor::reset);
        self.published = AlertState::default();
        self.board.publish(self.published);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::NUM_FACIAL_LANDMARKS, landmarks::Point2};

    /// Face whose eyes have the given half-opening and whose lips are `gap` apart
    fn face(eye_half_height: f64, gap: f64) -> LandmarkSet {
        let mut points = vec![Point2::new(0.0, 0.0); NUM_FACIAL_LANDMARKS];
        for start in [36, 42] {
            let x0 = if start == 36 { 100.0 } else { 160.0 };
            let eye = [
                (0.0, 0.0),
                (10.0, -eye_half_height),
                (20.0, -eye_half_height),
                (30.0, 0.0),
                (20.0, eye_half_height),
                (10.0, eye_half_height),
            ];
            for (i, (dx, dy)) in eye.into_iter().enumerate() {
                points[start + i] = Point2::new(x0 + dx, 100.0 + dy);
            }
        }
        for i in [50, 51, 52, 61, 62, 63] {
            points[i] = Point2::new(140.0, 200.0);
        }
        for i in [56, 57, 58, 65, 66, 67] {
            points[i] = Point2::new(140.0, 200.0 + gap);
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn test_report_values() {
        let mut monitor = FrameMonitor::default();
        // Half-height 3 on a 30-wide eye gives EAR 0.2
        let report = monitor.update(&face(3.0, 25.0)).unwrap();
        assert!((report.ear - 0.2).abs() < 1e-6);
        assert!((report.lip_distance - 25.0).abs() < 1e-12);
        assert_eq!(report.eye_count, 2);
        assert_eq!(report.yawn_count, 2);
        assert!(!report.alerts.any());
    }

    #[test]
    fn test_malformed_face_leaves_state() {
        let mut monitor = FrameMonitor::default();
        monitor.update(&face(3.0, 25.0)).unwrap();
        let short = LandmarkSet::new(face(3.0, 25.0).points()[..40].to_vec());
        assert!(monitor.update(&short).is_err());
        assert_eq!(monitor.drowsiness().count(), 2);
        assert_eq!(monitor.yawn().count(), 2);
    }

    #[test]
    fn test_no_faces_is_no_op() {
        let mut monitor = DriverMonitor::new(&Config::default()).unwrap();
        let board = monitor.alert_board();
        for _ in 0..4 {
            monitor.process_frame(&[face(6.0, 25.0)]);
        }
        assert!(monitor.alerts().is_yawning);
        let published = board.frames_published();

        for _ in 0..10 {
            let outcome = monitor.process_frame(&[]);
            assert!(outcome.reports.is_empty());
            assert!(outcome.alerts.is_yawning);
        }
        assert!(board.get_alert_state().is_yawning);
        assert_eq!(board.frames_published(), published);
    }

    #[test]
    fn test_faces_are_independent() {
        let mut monitor = DriverMonitor::new(&Config::default()).unwrap();
        for _ in 0..4 {
            monitor.process_frame(&[face(6.0, 5.0), face(6.0, 25.0)]);
        }
        assert_eq!(monitor.face_alerts(0), Some(AlertState::new(false, false)));
        assert_eq!(monitor.face_alerts(1), Some(AlertState::new(false, true)));
        // Only the primary face is published
        assert!(!monitor.alerts().is_yawning);
    }

    #[test]
    fn test_extra_faces_ignored() {
        let mut config = Config::default();
        config.face_detection.max_faces = 1;
        let mut monitor = DriverMonitor::new(&config).unwrap();
        let outcome = monitor.process_frame(&[face(6.0, 5.0), face(6.0, 5.0), face(6.0, 5.0)]);
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.ignored_faces, 2);
        assert!(monitor.face_alerts(1).is_none());
    }

    #[test]
    fn test_reset() {
        let mut monitor = DriverMonitor::new(&Config::default()).unwrap();
        for _ in 0..4 {
            monitor.process_frame(&[face(6.0, 25.0)]);
        }
        monitor.reset();
        assert_eq!(monitor.alerts(), AlertState::default());
        assert_eq!(monitor.alert_board().get_alert_state(), AlertState::default());
        assert_eq!(monitor.face(0).map(|f| f.yawn().count()), Some(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.smoothing.window_size = 0;
        assert!(DriverMonitor::new(&config).is_err());
    }
}
