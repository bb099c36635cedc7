//! Facial landmark sets and their anatomical views.
//!
//! A [`LandmarkSet`] is the ordered 68-point layout produced by the landmark
//! provider for one face in one frame. Call sites never index into it
//! directly; the named accessors below are the only place the anatomical
//! index ranges are used.

use crate::{
    constants::{
        LEFT_EYE, LOWER_LIP_INNER, LOWER_LIP_OUTER, MOUTH_INNER, MOUTH_OUTER, RIGHT_EYE, UPPER_LIP_INNER,
        UPPER_LIP_OUTER,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// 2D landmark point in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for (f64, f64) {
    fn from(p: Point2) -> Self {
        (p.x, p.y)
    }
}

/// Landmarks for one detected face in one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point2>,
}

impl LandmarkSet {
    /// Wrap provider output. The point count is checked lazily by the
    /// accessors, so partial sets are representable and rejected per face.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Six-point contour of the left eye
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the set is too short to contain the contour
    pub fn left_eye(&self) -> Result<&[Point2]> {
        self.slice(LEFT_EYE, "left eye")
    }

    /// Six-point contour of the right eye
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the set is too short to contain the contour
    pub fn right_eye(&self) -> Result<&[Point2]> {
        self.slice(RIGHT_EYE, "right eye")
    }

    /// Outer lip contour (12 points)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the set is too short to contain the contour
    pub fn mouth_outer(&self) -> Result<&[Point2]> {
        self.slice(MOUTH_OUTER, "outer mouth")
    }

    /// Inner lip contour (8 points)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the set is too short to contain the contour
    pub fn mouth_inner(&self) -> Result<&[Point2]> {
        self.slice(MOUTH_INNER, "inner mouth")
    }

    /// Upper lip cluster: centre of the outer contour followed by the inner contour
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the set is too short to contain the cluster
    pub fn upper_lip(&self) -> Result<Vec<Point2>> {
        self.cluster(UPPER_LIP_OUTER, UPPER_LIP_INNER, "upper lip")
    }

    /// Lower lip cluster: centre of the outer contour followed by the inner contour
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the set is too short to contain the cluster
    pub fn lower_lip(&self) -> Result<Vec<Point2>> {
        self.cluster(LOWER_LIP_OUTER, LOWER_LIP_INNER, "lower lip")
    }

    fn slice(&self, range: Range<usize>, part: &str) -> Result<&[Point2]> {
        let end = range.end;
        self.points.get(range).ok_or_else(|| {
            Error::InvalidInput(format!(
                "{part} needs {end} landmarks, face has {}",
                self.points.len()
            ))
        })
    }

    fn cluster(&self, outer: Range<usize>, inner: Range<usize>, part: &str) -> Result<Vec<Point2>> {
        let mut points = self.slice(outer, part)?.to_vec();
        points.extend_from_slice(self.slice(inner, part)?);
        Ok(points)
    }
}

impl From<Vec<Point2>> for LandmarkSet {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

impl From<Vec<(f64, f64)>> for LandmarkSet {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Point2::from).collect())
    }
}
