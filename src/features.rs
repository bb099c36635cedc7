//! Geometric features computed from landmark subsets.
//!
//! Both signals are pure functions of the points they are given. Inputs with
//! the wrong number of points or non-finite coordinates are rejected with
//! [`Error::InvalidInput`] so the monitor can skip the face for that frame.

use crate::{
    constants::{EAR_EPSILON, EYE_CONTOUR_POINTS, LIP_CLUSTER_POINTS},
    landmarks::{LandmarkSet, Point2},
    Error, Result,
};

/// Eye aspect ratio of one six-point eye contour.
///
/// Points follow the contour order: 0 and 3 are the corners, 1/2 the upper
/// lid and 5/4 the lower lid. Returns `(|p1-p5| + |p2-p4|) / (2|p0-p3| + ε)`.
///
/// # Errors
///
/// Returns `InvalidInput` unless exactly six finite points are supplied
pub fn eye_aspect_ratio(eye: &[Point2]) -> Result<f64> {
    if eye.len() != EYE_CONTOUR_POINTS {
        return Err(Error::InvalidInput(format!(
            "eye contour needs {EYE_CONTOUR_POINTS} points, got {}",
            eye.len()
        )));
    }
    ensure_finite(eye, "eye contour")?;

    let v1 = eye[1].distance(&eye[5]);
    let v2 = eye[2].distance(&eye[4]);
    let h = eye[0].distance(&eye[3]);

    finite_result((v1 + v2) / (2.0 * h + EAR_EPSILON), "eye aspect ratio")
}

/// Minimum EAR of the two eyes, so a single closing eye is enough to count.
///
/// # Errors
///
/// Returns `InvalidInput` if either contour is rejected by [`eye_aspect_ratio`]
pub fn combined_eye_aspect_ratio(left: &[Point2], right: &[Point2]) -> Result<f64> {
    Ok(eye_aspect_ratio(left)?.min(eye_aspect_ratio(right)?))
}

/// Vertical gap between the upper and lower lip cluster centroids.
///
/// # Errors
///
/// Returns `InvalidInput` unless both clusters hold six finite points
pub fn lip_distance(upper: &[Point2], lower: &[Point2]) -> Result<f64> {
    let top = centroid(upper, "upper lip")?;
    let bottom = centroid(lower, "lower lip")?;
    finite_result((top.y - bottom.y).abs(), "lip distance")
}

/// Both signals for one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFeatures {
    /// Combined (minimum) eye aspect ratio
    pub ear: f64,
    /// Lip separation in landmark units
    pub lip_distance: f64,
}

impl FaceFeatures {
    /// Extract both signals from a full landmark set
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any required subset is missing or degenerate
    pub fn extract(landmarks: &LandmarkSet) -> Result<Self> {
        let ear = combined_eye_aspect_ratio(landmarks.left_eye()?, landmarks.right_eye()?)?;
        let lip_distance = lip_distance(&landmarks.upper_lip()?, &landmarks.lower_lip()?)?;
        Ok(Self { ear, lip_distance })
    }
}

fn centroid(points: &[Point2], part: &str) -> Result<Point2> {
    if points.len() != LIP_CLUSTER_POINTS {
        return Err(Error::InvalidInput(format!(
            "{part} cluster needs {LIP_CLUSTER_POINTS} points, got {}",
            points.len()
        )));
    }
    ensure_finite(points, part)?;

    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Ok(Point2::new(sx / n, sy / n))
}

fn ensure_finite(points: &[Point2], part: &str) -> Result<()> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(i) => Err(Error::InvalidInput(format!("{part} point {i} is not finite"))),
        None => Ok(()),
    }
}

fn finite_result(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!("{what} is not finite: {value}")))
    }
}
