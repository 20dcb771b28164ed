//! Transform - 3x3 homogeneous map between image planes
//!
//! A [`Transform`] is a general 2D projective map. Similarity and affine
//! maps are the special case whose bottom row is `(0, 0, 1)`:
//!
//! ```text
//! | a  b  tx |        x' = (a*x + b*y + tx) / w
//! | c  d  ty |        y' = (c*x + d*y + ty) / w
//! | g  h  1  |        w  =  g*x + h*y + 1
//! ```
//!
//! Estimated transforms map observed (source image) coordinates onto the
//! canonical template. The resampler applies the inverse.

use crate::{TransformError, TransformResult};
use facealign_core::Point2D;
use nalgebra::{Matrix2, Matrix3, Vector3};

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPS: f64 = 1e-12;

/// Homogeneous weight magnitude below which a point maps to infinity.
pub const W_EPS: f64 = 1e-12;

/// Decomposition of a similarity transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityParams {
    /// Uniform scale factor
    pub scale: f64,
    /// Counter-clockwise rotation in radians (y axis pointing down)
    pub rotation: f64,
    /// X translation
    pub tx: f64,
    /// Y translation
    pub ty: f64,
}

impl SimilarityParams {
    /// Rotation in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// 2D projective transform stored as a 3x3 `f64` matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: Matrix3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create the identity transformation
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    /// Wrap a matrix.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidTransform`] if any entry is NaN or
    /// infinite.
    pub fn from_matrix(m: Matrix3<f64>) -> TransformResult<Self> {
        if m.iter().any(|v| !v.is_finite()) {
            return Err(TransformError::InvalidTransform(
                "matrix has non-finite entries".to_string(),
            ));
        }
        Ok(Self { m })
    }

    /// Create from row-major entries.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> TransformResult<Self> {
        Self::from_matrix(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    /// Create a similarity `x' = s R(angle) x + t`.
    ///
    /// # Arguments
    ///
    /// * `scale` - Uniform scale
    /// * `angle` - Rotation in radians
    /// * `tx`, `ty` - Translation applied after scaling and rotation
    pub fn similarity(scale: f64, angle: f64, tx: f64, ty: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: Matrix3::new(
                scale * cos,
                -scale * sin,
                tx,
                scale * sin,
                scale * cos,
                ty,
                0.0,
                0.0,
                1.0,
            ),
        }
    }

    /// Create a pure translation
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::similarity(1.0, 0.0, tx, ty)
    }

    /// Get the matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    /// Get row-major entries.
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        let mut rows = [[0.0; 3]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.m[(r, c)];
            }
        }
        rows
    }

    /// Determinant of the full 3x3 matrix.
    pub fn determinant(&self) -> f64 {
        self.m.determinant()
    }

    /// Determinant of the upper-left 2x2 linear part.
    pub fn linear_determinant(&self) -> f64 {
        Matrix2::new(self.m[(0, 0)], self.m[(0, 1)], self.m[(1, 0)], self.m[(1, 1)]).determinant()
    }

    /// Whether the bottom row is `(0, 0, 1)`.
    pub fn is_affine(&self) -> bool {
        self.m[(2, 0)].abs() <= SINGULAR_EPS
            && self.m[(2, 1)].abs() <= SINGULAR_EPS
            && (self.m[(2, 2)] - 1.0).abs() <= SINGULAR_EPS
    }

    /// Whether the map keeps handedness (never mirrors).
    ///
    /// For a projective map this is evaluated on the linear part, which is
    /// the local behaviour near the origin of the normalized plane.
    pub fn is_orientation_preserving(&self) -> bool {
        self.linear_determinant() * self.m[(2, 2)].signum() > 0.0
    }

    /// Map a point.
    ///
    /// Returns `None` when the point lands on the line at infinity.
    pub fn apply(&self, p: Point2D) -> Option<Point2D> {
        let v = self.m * Vector3::new(p.x, p.y, 1.0);
        if v.z.abs() <= W_EPS {
            return None;
        }
        let out = Point2D::new(v.x / v.z, v.y / v.z);
        out.is_finite().then_some(out)
    }

    /// Compute the inverse transformation.
    ///
    /// Projective results are rescaled so the bottom-right entry is 1.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidTransform`] if `|det| <= 1e-12`.
    pub fn inverse(&self) -> TransformResult<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= SINGULAR_EPS {
            return Err(TransformError::InvalidTransform(format!(
                "matrix is not invertible (det = {det:e})"
            )));
        }
        let inv = self.m.try_inverse().ok_or_else(|| {
            TransformError::InvalidTransform("matrix inversion failed".to_string())
        })?;
        let h = inv[(2, 2)];
        let inv = if h.abs() > W_EPS { inv / h } else { inv };
        Self::from_matrix(inv)
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Transform) -> Self {
        Self { m: self.m * other.m }
    }

    /// Decompose into scale, rotation and translation.
    ///
    /// Returns `None` for a non-affine matrix. For an affine matrix with
    /// shear or anisotropic scale, the values describe its first column.
    pub fn similarity_params(&self) -> Option<SimilarityParams> {
        if !self.is_affine() {
            return None;
        }
        let a = self.m[(0, 0)];
        let c = self.m[(1, 0)];
        Some(SimilarityParams {
            scale: a.hypot(c),
            rotation: c.atan2(a),
            tx: self.m[(0, 2)],
            ty: self.m[(1, 2)],
        })
    }

    /// Root-mean-square distance between `self(src[i])` and `dst[i]`.
    ///
    /// Points that map to infinity count as infinite error.
    pub fn rms_error(&self, src: &[Point2D], dst: &[Point2D]) -> f64 {
        let n = src.len().min(dst.len());
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = src
            .iter()
            .zip(dst)
            .map(|(s, d)| match self.apply(*s) {
                Some(p) => {
                    let e = p.distance(d);
                    e * e
                }
                None => f64::INFINITY,
            })
            .sum();
        (sum / n as f64).sqrt()
    }
}
