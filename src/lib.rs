//! Driver drowsiness and yawn monitoring from facial landmarks.
//!
//! The library turns a stream of 68-point facial landmark sets into two
//! debounced alerts:
//! 1. Geometric features per face: eye aspect ratio (EAR) and lip distance
//! 2. Sliding-window smoothing of each signal
//! 3. Counter-based hysteresis per signal, engaging faster than it releases
//! 4. Publication of the latest alert pair for readers on other threads
//!
//! Frame capture and landmark localisation are collaborators behind the
//! [`source::FrameSource`] and [`source::LandmarkProvider`] traits. Recorded
//! landmark sessions can be replayed from JSON lines; live camera input with
//! `OpenCV` and `ONNX` Runtime is available behind the `vision` feature.
//!
//! # Examples
//!
//! ## Monitoring landmark sets
//!
//! ```no_run
//! use driver_monitor::{config::Config, landmarks::LandmarkSet, monitor::DriverMonitor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut monitor = DriverMonitor::new(&Config::default())?;
//!
//! // One landmark set per detected face, from any provider
//! let faces: Vec<LandmarkSet> = Vec::new();
//! let outcome = monitor.process_frame(&faces);
//!
//! if outcome.alerts.is_drowsy {
//!     println!("Drowsiness alert");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading alerts from another thread
//!
//! ```no_run
//! use driver_monitor::{config::Config, monitor::DriverMonitor};
//! use std::{thread, time::Duration};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let monitor = DriverMonitor::new(&Config::default())?;
//! let board = monitor.alert_board();
//!
//! thread::spawn(move || loop {
//!     let state = board.get_alert_state();
//!     println!("drowsy: {}, yawning: {}", state.is_drowsy, state.is_yawning);
//!     thread::sleep(Duration::from_millis(300));
//! });
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying a recorded session
//!
//! ```no_run
//! use driver_monitor::{
//!     app::MonitorApp, config::Config, monitor::DriverMonitor,
//!     replay::{ReplayLandmarks, ReplaySource},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let monitor = DriverMonitor::new(&Config::default())?;
//! let source = ReplaySource::open("session.jsonl")?;
//! let mut app = MonitorApp::new(source, ReplayLandmarks, monitor);
//! let summary = app.run(None);
//! println!("{} frames, {} drowsy", summary.frames, summary.drowsy_frames);
//! # Ok(())
//! # }
//! ```

/// Latest alert state and its cross-thread board
pub mod alert;

/// Main monitoring loop
pub mod app;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Error types and result handling
pub mod error;

/// Eye aspect ratio and lip distance
pub mod features;

/// Sliding-window smoothers
pub mod filters;

/// Debounced per-signal alert state machines
pub mod hysteresis;

/// Landmark sets and anatomical views
pub mod landmarks;

/// Per-face and multi-face orchestration
pub mod monitor;

/// JSON-lines landmark replay
pub mod replay;

/// Frame source and landmark provider interfaces
pub mod source;

/// Live camera input via `OpenCV` and `ONNX` Runtime
#[cfg(feature = "vision")]
pub mod vision;

pub use error::{Error, Result};
