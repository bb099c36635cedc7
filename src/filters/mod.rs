//! Sliding-window smoothing of per-frame feature signals.
//!
//! Each monitored signal owns one filter instance; filters never share state.

/// Moving average filter (the default smoother)
pub mod moving_average;

/// Median filter for outlier rejection
pub mod median;

use crate::{constants::MAX_SMOOTHING_WINDOW, Error, Result};

/// Trait for all signal smoothers
pub trait SignalFilter: Send + Sync {
    /// Push a sample and return the smoothed value
    fn apply(&mut self, sample: f64) -> f64;

    /// Smoothed value of the current contents, 0.0 when empty
    fn value(&self) -> f64;

    /// Number of samples currently held
    fn len(&self) -> usize;

    /// True if no sample has been pushed since construction or reset
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// Create a signal filter by type name
///
/// # Errors
///
/// Returns `FilterError` for an unknown filter name or a zero window
pub fn create_filter(filter_type: &str, window_size: usize) -> Result<Box<dyn SignalFilter>> {
    if window_size == 0 {
        return Err(Error::FilterError("Window size must be greater than 0".to_string()));
    }
    if window_size > MAX_SMOOTHING_WINDOW {
        return Err(Error::FilterError(format!(
            "Window size {window_size} exceeds the maximum of {MAX_SMOOTHING_WINDOW}"
        )));
    }

    match filter_type.to_lowercase().as_str() {
        "moving_average" | "movingaverage" | "mean" => {
            Ok(Box::new(moving_average::MovingAverageFilter::new(window_size)))
        }
        "median" => Ok(Box::new(median::MedianFilter::new(window_size))),
        _ => Err(Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
