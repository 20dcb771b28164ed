//! Point2D, LandmarkSet - Facial keypoints
//!
//! A landmark set is an ordered list of image-space points. Order carries
//! the anatomical meaning: for the five-point layout it is left eye, right
//! eye, nose tip, left mouth corner, right mouth corner.
//!
//! The set is sized at runtime, so it is validated on construction rather
//! than trusted. Matching its length against a template is left to the
//! estimator.

use crate::error::{Error, Result};

/// Number of points in the standard five-point face layout.
pub const FIVE_POINT_COUNT: usize = 5;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f32; 2]> for Point2D {
    fn from(p: [f32; 2]) -> Self {
        Self::new(p[0] as f64, p[1] as f64)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Ordered, validated set of landmark points.
///
/// # Examples
///
/// ```
/// use facealign_core::LandmarkSet;
///
/// let set = LandmarkSet::from_pairs(&[[38.0, 51.0], [73.0, 51.0], [56.0, 71.0]]).unwrap();
/// assert_eq!(set.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point2D>,
}

impl LandmarkSet {
    /// Create a set from points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for an empty list and
    /// [`Error::NonFiniteCoordinate`] if any coordinate is NaN or infinite.
    pub fn new(points: Vec<Point2D>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidParameter(
                "landmark set must not be empty".to_string(),
            ));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index });
        }
        Ok(Self { points })
    }

    /// Create a set from compact `[x, y]` pairs.
    pub fn from_pairs(pairs: &[[f32; 2]]) -> Result<Self> {
        Self::new(pairs.iter().map(|&p| Point2D::from(p)).collect())
    }

    /// Create a set from detector rows.
    ///
    /// Each row holds at least `x` and `y`; further columns (scores,
    /// visibility) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any row has fewer than two
    /// columns.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let mut points = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() < 2 {
                return Err(Error::InvalidParameter(format!(
                    "landmark row {i} has {} columns, need at least 2",
                    row.len()
                )));
            }
            points.push(Point2D::new(row[0] as f64, row[1] as f64));
        }
        Self::new(points)
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed set; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get a point by index.
    pub fn get(&self, index: usize) -> Option<Point2D> {
        self.points.get(index).copied()
    }

    /// Get the points as a slice.
    #[inline]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Iterate over the points.
    pub fn iter(&self) -> std::slice::Iter<'_, Point2D> {
        self.points.iter()
    }

    /// Check the length against an expected cardinality.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CardinalityMismatch`] if the lengths differ.
    pub fn ensure_len(&self, expected: usize) -> Result<()> {
        if self.points.len() != expected {
            return Err(Error::CardinalityMismatch {
                expected,
                actual: self.points.len(),
            });
        }
        Ok(())
    }

    /// Centroid of the points.
    pub fn centroid(&self) -> Point2D {
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2D::new(sx / n, sy / n)
    }

    /// Return a new set with `f` applied to each point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteCoordinate`] if `f` yields a non-finite
    /// point.
    pub fn map<F>(&self, f: F) -> Result<Self>
    where
        F: FnMut(&Point2D) -> Point2D,
    {
        Self::new(self.points.iter().map(f).collect())
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Point2D;
    type IntoIter = std::slice::Iter<'a, Point2D>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
