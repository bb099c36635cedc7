//! Collaborator interfaces around the alert pipeline.
//!
//! Frame acquisition and landmark localisation live outside the core. The
//! monitoring loop only needs something that yields frames and something that
//! turns a frame into zero or more landmark sets.

use crate::{landmarks::LandmarkSet, Result};
use log::warn;
use std::fmt::Debug;

/// Supplies frames one at a time
pub trait FrameSource {
    /// Frame type handed to the landmark provider
    type Frame;

    /// Next frame, or `None` at the end of the stream
    ///
    /// # Errors
    ///
    /// Returns an error if this frame could not be read. The stream may still
    /// yield further frames.
    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Locates faces in a frame and returns their 68-point landmarks
pub trait LandmarkProvider<F> {
    /// Landmark sets for every face found, possibly none
    ///
    /// # Errors
    ///
    /// Returns an error if detection failed for this frame
    fn detect_faces(&mut self, frame: &F) -> Result<Vec<LandmarkSet>>;
}

impl<F, P> LandmarkProvider<F> for Box<P>
where
    P: LandmarkProvider<F> + ?Sized,
{
    fn detect_faces(&mut self, frame: &F) -> Result<Vec<LandmarkSet>> {
        (**self).detect_faces(frame)
    }
}

/// Run `detect` on every face region, keeping the faces that succeed.
///
/// A failure on one region is logged and drops only that face; the rest of
/// the frame is still returned in detection order.
pub fn landmarks_per_face<R, I, F>(regions: I, mut detect: F) -> Vec<LandmarkSet>
where
    R: Debug,
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> Result<LandmarkSet>,
{
    regions
        .into_iter()
        .enumerate()
        .filter_map(|(index, region)| match detect(&region) {
            Ok(landmarks) => Some(landmarks),
            Err(e) => {
                warn!("Landmark detection failed for face {index} at {region:?}: {e}");
                None
            }
        })
        .collect()
}

/// In-memory source over pre-built frames, mainly for tests and benchmarks
#[derive(Debug, Clone, Default)]
pub struct VecSource<T> {
    frames: std::collections::VecDeque<T>,
}

impl<T> VecSource<T> {
    #[must_use]
    pub fn new(frames: Vec<T>) -> Self {
        Self { frames: frames.into() }
    }
}

impl<T> FrameSource for VecSource<T> {
    type Frame = T;

    fn next_frame(&mut self) -> Result<Option<T>> {
        Ok(self.frames.pop_front())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} frames left)", self.frames.len())
    }
}

/// Provider for frames that already carry their landmark sets
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedLandmarks;

impl LandmarkProvider<Vec<LandmarkSet>> for PrecomputedLandmarks {
    fn detect_faces(&mut self, frame: &Vec<LandmarkSet>) -> Result<Vec<LandmarkSet>> {
        Ok(frame.clone())
    }
}
