//! Latest alert state shared with readers on other threads.
//!
//! The monitor publishes both flags with a single atomic store after each
//! frame, so a reader always sees a pair computed from the same frame and
//! never waits on frame processing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

const DROWSY_BIT: u8 = 0b01;
const YAWNING_BIT: u8 = 0b10;

/// Alert flags for one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertState {
    /// Eyes have stayed closed long enough to raise the drowsiness alert
    pub is_drowsy: bool,
    /// Mouth has stayed open long enough to raise the yawn alert
    pub is_yawning: bool,
}

impl AlertState {
    #[must_use]
    pub const fn new(is_drowsy: bool, is_yawning: bool) -> Self {
        Self { is_drowsy, is_yawning }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.is_drowsy || self.is_yawning
    }

    fn to_bits(self) -> u8 {
        let mut bits = 0;
        if self.is_drowsy {
            bits |= DROWSY_BIT;
        }
        if self.is_yawning {
            bits |= YAWNING_BIT;
        }
        bits
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            is_drowsy: bits & DROWSY_BIT != 0,
            is_yawning: bits & YAWNING_BIT != 0,
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drowsy={} yawning={}", self.is_drowsy, self.is_yawning)
    }
}

/// Single-writer, many-reader board holding the most recent [`AlertState`]
#[derive(Debug, Default)]
pub struct AlertBoard {
    flags: AtomicU8,
    frames: AtomicU64,
}

impl AlertBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published state
    pub fn publish(&self, state: AlertState) {
        self.flags.store(state.to_bits(), Ordering::Release);
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Most recently published state
    #[must_use]
    pub fn get_alert_state(&self) -> AlertState {
        AlertState::from_bits(self.flags.load(Ordering::Acquire))
    }

    /// Number of publications so far
    #[must_use]
    pub fn frames_published(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_bits_round_trip() {
        for state in [
            AlertState::new(false, false),
            AlertState::new(true, false),
            AlertState::new(false, true),
            AlertState::new(true, true),
        ] {
            assert_eq!(AlertState::from_bits(state.to_bits()), state);
        }
    }

    #[test]
    fn test_board_starts_quiet() {
        let board = AlertBoard::new();
        assert_eq!(board.get_alert_state(), AlertState::default());
        assert_eq!(board.frames_published(), 0);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&AlertState::new(true, false)).unwrap();
        assert_eq!(json, r#"{"is_drowsy":true,"is_yawning":false}"#);
    }

    #[test]
    fn test_reader_sees_whole_pairs() {
        let board = Arc::new(AlertBoard::new());
        let writer = {
            let board = Arc::clone(&board);
            thread::spawn(move || {
                for i in 0..10_000 {
                    // Flags always move together
                    let on = i % 2 == 0;
                    board.publish(AlertState::new(on, on));
                }
            })
        };

        for _ in 0..10_000 {
            let state = board.get_alert_state();
            assert_eq!(state.is_drowsy, state.is_yawning);
        }
        writer.join().unwrap();
        assert_eq!(board.frames_published(), 10_000);
    }
}
