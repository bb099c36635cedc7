use super::SignalFilter;
use crate::constants::MAX_SMOOTHING_WINDOW;
use std::collections::VecDeque;

/// Moving average over the last `window_size` samples
///
/// The mean is recomputed from the buffer on every read, so it cannot drift.
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size.min(MAX_SMOOTHING_WINDOW)),
        }
    }

    /// Append a sample, evicting the oldest once the window is full
    pub fn push(&mut self, sample: f64) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
    }

    /// Arithmetic mean of the current contents, 0.0 before the first push
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.buffer.iter().sum::<f64>() / self.buffer.len() as f64
    }

    /// Samples currently held, oldest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.buffer.iter().copied()
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl SignalFilter for MovingAverageFilter {
    fn apply(&mut self, sample: f64) -> f64 {
        self.push(sample);
        self.mean()
    }

    fn value(&self) -> f64 {
        self.mean()
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "moving_average"
    }
}
