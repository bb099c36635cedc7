use super::SignalFilter;
use crate::constants::MAX_SMOOTHING_WINDOW;
use std::collections::VecDeque;

/// Median of the most recent samples, robust to single-frame landmark glitches
#[derive(Debug, Clone)]
pub struct MedianFilter {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl MedianFilter {
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            capacity: window_size,
            samples: VecDeque::with_capacity(window_size.min(MAX_SMOOTHING_WINDOW)),
        }
    }

    /// Median of the window; the mean of the two middle samples for even counts
    #[must_use]
    pub fn median(&self) -> f64 {
        let mut ordered: Vec<f64> = self.samples.iter().copied().collect();
        let mid = ordered.len() / 2;
        match ordered.len() {
            0 => 0.0,
            n if n % 2 == 1 => *ordered.select_nth_unstable_by(mid, f64::total_cmp).1,
            _ => {
                let (lower, upper, _) = ordered.select_nth_unstable_by(mid, f64::total_cmp);
                let below = lower.iter().copied().max_by(f64::total_cmp).unwrap_or(*upper);
                (below + *upper) / 2.0
            }
        }
    }
}

impl SignalFilter for MedianFilter {
    fn apply(&mut self, sample: f64) -> f64 {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.median()
    }

    fn value(&self) -> f64 {
        self.median()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn reset(&mut self) {
        self.samples.clear();
    }

    fn name(&self) -> &str {
        "median"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_median() {
        let mut filter = MedianFilter::new(3);

        assert_eq!(filter.apply(0.30), 0.30);
        assert_eq!(filter.apply(0.20), 0.25); // median of [0.30, 0.20]
        assert_eq!(filter.apply(0.10), 0.20);
        assert_eq!(filter.apply(0.40), 0.20); // window now [0.20, 0.10, 0.40]
    }

    #[test]
    fn test_glitch_rejected() {
        let mut filter = MedianFilter::new(3);

        filter.apply(10.0);
        filter.apply(11.0);
        // A single-frame landmark glitch does not move the output
        assert_eq!(filter.apply(100.0), 11.0);
    }

    #[test]
    fn test_nan_does_not_panic() {
        let mut filter = MedianFilter::new(4);
        filter.apply(1.0);
        filter.apply(f64::NAN);
        let _ = filter.apply(2.0);
    }
}
