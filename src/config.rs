//! Configuration management for the driver monitor

use crate::{
    constants::{
        DEFAULT_DECREMENT, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_INCREMENT,
        DEFAULT_SMOOTHING_WINDOW, MAX_FACES, MAX_SMOOTHING_WINDOW,
    },
    hysteresis::{EyeClosure, MouthOpening, Signal},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Smoothing methods accepted by [`crate::filters::create_filter`]
pub const SMOOTHING_METHODS: &[&str] = &["moving_average", "median"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Eye-closure (EAR) alert parameters
    pub drowsiness: DrowsinessConfig,

    /// Lip-distance alert parameters
    pub yawn: YawnConfig,

    /// Sliding-window smoothing
    pub smoothing: SmoothingConfig,

    /// Model file paths (live video only)
    pub models: ModelConfig,

    /// Face detection configuration
    pub face_detection: FaceDetectionConfig,

    /// Video input configuration
    pub video: VideoConfig,
}

/// Threshold and hysteresis rates for one signal.
///
/// Missing fields take the defaults of the signal `S`, so a section may set
/// only the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound = "S: Signal")]
pub struct SignalConfig<S> {
    /// Alert threshold on the smoothed signal
    pub threshold: f64,

    /// Counter value at which the alert engages
    pub consec_frames: u32,

    /// Counter increase per alerting frame
    pub increment: u32,

    /// Counter decrease per quiet frame
    pub decrement: u32,

    #[serde(skip)]
    _signal: PhantomData<S>,
}

/// Drowsiness section: EAR below 0.27, limit 17
pub type DrowsinessConfig = SignalConfig<EyeClosure>;

/// Yawn section: lip distance above 20.0, limit 7
pub type YawnConfig = SignalConfig<MouthOpening>;

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Smoother type (`moving_average` or `median`)
    pub method: String,

    /// Number of recent samples kept per signal
    pub window_size: usize,
}

/// Model file paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the face detection ONNX model (`YuNet`)
    pub face_detector: PathBuf,

    /// Path to the 68-point facial landmarks ONNX model
    pub face_landmarks: PathBuf,
}

/// Face detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetectionConfig {
    /// Confidence threshold for face detection (0.0-1.0)
    pub confidence_threshold: f32,

    /// IOU threshold for non-maximum suppression (0.0-1.0)
    pub nms_threshold: f32,

    /// Maximum number of faces monitored per frame
    pub max_faces: usize,

    /// Face region expansion factor before landmark detection
    pub bbox_expansion: f32,
}

/// Video input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Processing width; frames are resized to this before detection
    pub frame_width: i32,

    /// Processing height
    pub frame_height: i32,
}

impl<S: Signal> Default for SignalConfig<S> {
    fn default() -> Self {
        Self::new(S::DEFAULT_THRESHOLD, S::DEFAULT_CONSEC_FRAMES)
    }
}

impl<S: Signal> SignalConfig<S> {
    /// Section with the given threshold and limit and the default rates
    #[must_use]
    pub fn new(threshold: f64, consec_frames: u32) -> Self {
        Self {
            threshold,
            consec_frames,
            increment: DEFAULT_INCREMENT,
            decrement: DEFAULT_DECREMENT,
            _signal: PhantomData,
        }
    }

    /// Validate one signal section
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the section on the first invalid field
    pub fn validate(&self) -> Result<()> {
        let name = S::NAME;
        if !self.threshold.is_finite() {
            return Err(Error::ConfigError(format!("{name} threshold must be finite")));
        }
        if self.consec_frames == 0 {
            return Err(Error::ConfigError(format!(
                "{name} consec_frames must be greater than 0"
            )));
        }
        if self.increment == 0 {
            return Err(Error::ConfigError(format!("{name} increment must be greater than 0")));
        }
        if self.decrement == 0 {
            return Err(Error::ConfigError(format!("{name} decrement must be greater than 0")));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drowsiness: DrowsinessConfig::default(),
            yawn: YawnConfig::default(),
            smoothing: SmoothingConfig::default(),
            models: ModelConfig::default(),
            face_detection: FaceDetectionConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            method: "moving_average".to_string(),
            window_size: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from("assets/face_detection_yunet.onnx"),
            face_landmarks: PathBuf::from("assets/face_landmarks.onnx"),
        }
    }
}

impl Default for FaceDetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            nms_threshold: 0.3,
            max_faces: 4,
            bbox_expansion: 0.2,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text. Missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        self.drowsiness.validate()?;
        self.yawn.validate()?;

        if self.drowsiness.threshold <= 0.0 {
            return Err(Error::ConfigError(
                "drowsiness threshold must be greater than 0".to_string(),
            ));
        }
        if self.yawn.threshold < 0.0 {
            return Err(Error::ConfigError("yawn threshold must not be negative".to_string()));
        }

        // Validate smoothing
        if self.smoothing.window_size == 0 || self.smoothing.window_size > MAX_SMOOTHING_WINDOW {
            return Err(Error::ConfigError(format!(
                "Smoothing window size must be between 1 and {MAX_SMOOTHING_WINDOW}, got {}",
                self.smoothing.window_size
            )));
        }
        if !SMOOTHING_METHODS.contains(&self.smoothing.method.to_lowercase().as_str()) {
            return Err(Error::ConfigError(format!(
                "Unknown smoothing method '{}', expected one of {SMOOTHING_METHODS:?}",
                self.smoothing.method
            )));
        }

        // Validate detection thresholds
        if !(0.0..=1.0).contains(&self.face_detection.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.face_detection.nms_threshold) {
            return Err(Error::ConfigError(
                "NMS threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.face_detection.max_faces == 0 || self.face_detection.max_faces > MAX_FACES {
            return Err(Error::ConfigError(format!(
                "max_faces must be between 1 and {MAX_FACES}, got {}",
                self.face_detection.max_faces
            )));
        }

        if self.video.frame_width <= 0 || self.video.frame_height <= 0 {
            return Err(Error::ConfigError("Frame size must be positive".to_string()));
        }

        Ok(())
    }

    /// Check that the model files needed for live video exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first missing model file
    pub fn validate_models(&self) -> Result<()> {
        if !self.models.face_detector.exists() {
            return Err(Error::ConfigError(format!(
                "Face detector model not found: {}",
                self.models.face_detector.display()
            )));
        }
        if !self.models.face_landmarks.exists() {
            return Err(Error::ConfigError(format!(
                "Face landmarks model not found: {}",
                self.models.face_landmarks.display()
            )));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Driver Monitor Configuration

# Eye closure: alert when the smoothed eye aspect ratio stays below threshold
drowsiness:
  threshold: 0.27
  consec_frames: 17
  increment: 2
  decrement: 1

# Yawning: alert when the smoothed lip distance stays above threshold
yawn:
  threshold: 20.0
  consec_frames: 7
  increment: 2
  decrement: 1

# Sliding-window smoothing
smoothing:
  method: "moving_average"
  window_size: 5

# Model paths (live video only)
models:
  face_detector: "assets/face_detection_yunet.onnx"
  face_landmarks: "assets/face_landmarks.onnx"

# Face detection parameters
face_detection:
  confidence_threshold: 0.6
  nms_threshold: 0.3
  max_faces: 4
  bbox_expansion: 0.2

# Video input
video:
  frame_width: 640
  frame_height: 480
"#;
