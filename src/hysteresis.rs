//! Debounced alert state driven by a smoothed signal.
//!
//! A [`HysteresisStateMachine`] keeps a counter in `[0, consec_limit]`. Frames
//! meeting the alert condition add `increment`, other frames subtract
//! `decrement`, both saturating at the bounds. The alert turns on once the
//! counter reaches the limit and turns off as soon as it drops below it.
//!
//! The comparison direction is a property of the signal type, so drowsiness
//! (EAR below threshold) and yawning (lip distance above threshold) share one
//! implementation.

use crate::{
    config::SignalConfig,
    constants::{DEFAULT_EAR_CONSEC_FRAMES, DEFAULT_EAR_THRESHOLD, DEFAULT_YAWN_CONSEC_FRAMES, DEFAULT_YAWN_THRESHOLD},
    Result,
};
use std::fmt;
use std::marker::PhantomData;

/// A monitored signal and the direction in which it raises an alert
pub trait Signal {
    /// Short name used in logs and configuration errors
    const NAME: &'static str;

    /// Threshold used when the configuration does not set one
    const DEFAULT_THRESHOLD: f64;

    /// Counter limit used when the configuration does not set one
    const DEFAULT_CONSEC_FRAMES: u32;

    /// True if `value` meets the alert condition for `threshold`
    fn is_alerting(value: f64, threshold: f64) -> bool;
}

/// Eye closure: alerts while the eye aspect ratio is below the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeClosure;

impl Signal for EyeClosure {
    const NAME: &'static str = "drowsiness";
    const DEFAULT_THRESHOLD: f64 = DEFAULT_EAR_THRESHOLD;
    const DEFAULT_CONSEC_FRAMES: u32 = DEFAULT_EAR_CONSEC_FRAMES;

    fn is_alerting(value: f64, threshold: f64) -> bool {
        value < threshold
    }
}

/// Mouth opening: alerts while the lip distance is above the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouthOpening;

impl Signal for MouthOpening {
    const NAME: &'static str = "yawn";
    const DEFAULT_THRESHOLD: f64 = DEFAULT_YAWN_THRESHOLD;
    const DEFAULT_CONSEC_FRAMES: u32 = DEFAULT_YAWN_CONSEC_FRAMES;

    fn is_alerting(value: f64, threshold: f64) -> bool {
        value > threshold
    }
}

/// Alert state of one signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertLevel {
    #[default]
    Inactive,
    Active,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// Counter-based hysteresis for one signal
#[derive(Debug, Clone)]
pub struct HysteresisStateMachine<S: Signal> {
    threshold: f64,
    consec_limit: u32,
    increment: u32,
    decrement: u32,
    count: u32,
    level: AlertLevel,
    _signal: PhantomData<S>,
}

impl<S: Signal> HysteresisStateMachine<S> {
    /// Create an inactive state machine
    ///
    /// # Panics
    ///
    /// Panics if `consec_limit`, `increment` or `decrement` is zero
    #[must_use]
    pub fn new(threshold: f64, consec_limit: u32, increment: u32, decrement: u32) -> Self {
        assert!(consec_limit > 0, "Consecutive frame limit must be greater than 0");
        assert!(increment > 0, "Increment must be greater than 0");
        assert!(decrement > 0, "Decrement must be greater than 0");
        Self {
            threshold,
            consec_limit,
            increment,
            decrement,
            count: 0,
            level: AlertLevel::Inactive,
            _signal: PhantomData,
        }
    }

    /// Build from a signal section of the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the section fails validation
    pub fn from_config(config: &SignalConfig<S>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.threshold, config.consec_frames, config.increment, config.decrement))
    }

    /// Advance one frame with the smoothed signal value. Returns true while active.
    ///
    /// NaN never meets the alert condition, so it counts as a quiet frame.
    pub fn update(&mut self, value: f64) -> bool {
        if S::is_alerting(value, self.threshold) {
            self.count = self.count.saturating_add(self.increment).min(self.consec_limit);
            if self.count >= self.consec_limit {
                self.level = AlertLevel::Active;
            }
        } else {
            self.count = self.count.saturating_sub(self.decrement);
            if self.count < self.consec_limit {
                self.level = AlertLevel::Inactive;
            }
        }
        self.is_active()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.level == AlertLevel::Active
    }

    #[must_use]
    pub fn level(&self) -> AlertLevel {
        self.level
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn consec_limit(&self) -> u32 {
        self.consec_limit
    }

    /// Return to the initial inactive state
    pub fn reset(&mut self) {
        self.count = 0;
        self.level = AlertLevel::Inactive;
    }
}

/// Drowsiness state machine
pub type DrowsinessDetector = HysteresisStateMachine<EyeClosure>;

/// Yawn state machine
pub type YawnDetector = HysteresisStateMachine<MouthOpening>;
