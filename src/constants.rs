//! Constants used throughout the application

use std::ops::Range;

/// Number of facial landmarks for full face
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Points per eye contour
pub const EYE_CONTOUR_POINTS: usize = 6;

/// Points per lip cluster (three outer-contour plus three inner-contour)
pub const LIP_CLUSTER_POINTS: usize = 6;

/// Right eye contour (subject's right, image left)
pub const RIGHT_EYE: Range<usize> = 36..42;

/// Left eye contour
pub const LEFT_EYE: Range<usize> = 42..48;

/// Outer lip contour
pub const MOUTH_OUTER: Range<usize> = 48..60;

/// Inner lip contour
pub const MOUTH_INNER: Range<usize> = 60..68;

/// Upper lip, outer contour centre points
pub const UPPER_LIP_OUTER: Range<usize> = 50..53;

/// Upper lip, inner contour points
pub const UPPER_LIP_INNER: Range<usize> = 61..64;

/// Lower lip, outer contour centre points
pub const LOWER_LIP_OUTER: Range<usize> = 56..59;

/// Lower lip, inner contour points
pub const LOWER_LIP_INNER: Range<usize> = 65..68;

/// Guard added to the EAR denominator for degenerate eye contours
pub const EAR_EPSILON: f64 = 1e-6;

/// Default drowsiness thresholds
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.27;
pub const DEFAULT_EAR_CONSEC_FRAMES: u32 = 17;

/// Default yawn thresholds (landmark coordinate units)
pub const DEFAULT_YAWN_THRESHOLD: f64 = 20.0;
pub const DEFAULT_YAWN_CONSEC_FRAMES: u32 = 7;

/// Default hysteresis rates
pub const DEFAULT_INCREMENT: u32 = 2;
pub const DEFAULT_DECREMENT: u32 = 1;

/// Default smoothing window
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Largest accepted smoothing window
pub const MAX_SMOOTHING_WINDOW: usize = 1024;

/// Largest number of faces monitored per frame
pub const MAX_FACES: usize = 16;

/// Default polling cadence for alert consumers
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;

/// Default processing frame size
pub const DEFAULT_FRAME_WIDTH: i32 = 640;
pub const DEFAULT_FRAME_HEIGHT: i32 = 480;
