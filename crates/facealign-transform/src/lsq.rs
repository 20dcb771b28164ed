//! Least-squares affine and projective fits
//!
//! Both fits solve a linear system in the matrix entries after Hartley
//! normalization (centroid at the origin, mean distance sqrt(2)), which
//! keeps the system well conditioned for pixel-scale coordinates.
//!
//! ```text
//! affine:      x' = a*x + b*y + c               (6 unknowns)
//!              y' = d*x + e*y + f
//! projective:  x' = (a*x + b*y + c) / (g*x + h*y + 1)   (8 unknowns)
//!              y' = (d*x + e*y + f) / (g*x + h*y + 1)
//! ```
//!
//! The system is solved through SVD; a numerical rank below the number of
//! unknowns means the correspondence does not determine the map.

use crate::matrix::{Transform, W_EPS};
use crate::{TransformError, TransformResult};
use facealign_core::Point2D;
use nalgebra::{DMatrix, DVector, Matrix3};

/// Relative singular value threshold for the rank test.
const RANK_EPS: f64 = 1e-9;

/// Similarity that moves a point set to zero mean and mean norm sqrt(2).
struct Normalization {
    cx: f64,
    cy: f64,
    s: f64,
}

impl Normalization {
    fn of(points: &[Point2D]) -> TransformResult<Self> {
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        let (cx, cy) = (sx / n, sy / n);
        let mean_dist = points
            .iter()
            .map(|p| (p.x - cx).hypot(p.y - cy))
            .sum::<f64>()
            / n;
        if !(mean_dist > 1e-12 * (1.0 + cx.hypot(cy))) {
            return Err(TransformError::DegenerateInput(
                "points coincide".to_string(),
            ));
        }
        Ok(Self {
            cx,
            cy,
            s: std::f64::consts::SQRT_2 / mean_dist,
        })
    }

    fn apply(&self, p: &Point2D) -> (f64, f64) {
        (self.s * (p.x - self.cx), self.s * (p.y - self.cy))
    }

    fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.s,
            0.0,
            -self.s * self.cx,
            0.0,
            self.s,
            -self.s * self.cy,
            0.0,
            0.0,
            1.0,
        )
    }

    fn inverse_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            1.0 / self.s,
            0.0,
            self.cx,
            0.0,
            1.0 / self.s,
            self.cy,
            0.0,
            0.0,
            1.0,
        )
    }
}

/// Solve `a * x = b` in the least-squares sense, requiring full column rank.
fn solve_full_rank(
    a: DMatrix<f64>,
    b: DVector<f64>,
    what: &str,
) -> TransformResult<DVector<f64>> {
    let unknowns = a.ncols();
    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    let eps = RANK_EPS * max_sv;
    let rank = svd.rank(eps);
    if rank < unknowns {
        return Err(TransformError::DegenerateInput(format!(
            "{what} system has rank {rank} < {unknowns}; points are collinear or repeated"
        )));
    }
    svd.solve(&b, eps)
        .map_err(|e| TransformError::DegenerateInput(format!("{what} solve failed: {e}")))
}

fn check_pairs(src: &[Point2D], dst: &[Point2D], min: usize, what: &str) -> TransformResult<()> {
    if src.len() != dst.len() || src.len() < min {
        return Err(TransformError::DegenerateInput(format!(
            "{what} fit needs at least {min} paired points, got {} and {}",
            src.len(),
            dst.len()
        )));
    }
    Ok(())
}

/// Undo both normalizations and scale the bottom-right entry to 1.
///
/// The singularity test runs on the normalized matrix, whose entries are
/// of order one whatever the pixel scale.
fn denormalize(
    h_norm: Matrix3<f64>,
    src_norm: &Normalization,
    dst_norm: &Normalization,
) -> TransformResult<Transform> {
    if !(h_norm.determinant().abs() > RANK_EPS) {
        return Err(TransformError::DegenerateInput(
            "fitted matrix is singular; reference points are collinear".to_string(),
        ));
    }
    let h = dst_norm.inverse_matrix() * h_norm * src_norm.matrix();
    let h22 = h[(2, 2)];
    if !(h22.abs() > W_EPS) {
        return Err(TransformError::DegenerateInput(
            "fitted matrix has a vanishing homogeneous scale".to_string(),
        ));
    }
    Transform::from_matrix(h / h22)
}

/// Fit a 6-parameter affine map sending `src[i]` to `dst[i]`.
///
/// # Errors
///
/// Returns [`TransformError::DegenerateInput`] for fewer than 3 points or a
/// collinear source or destination configuration.
pub fn fit_affine(src: &[Point2D], dst: &[Point2D]) -> TransformResult<Transform> {
    check_pairs(src, dst, 3, "affine")?;
    let sn = Normalization::of(src)?;
    let dn = Normalization::of(dst)?;

    let n = src.len();
    let mut a = DMatrix::zeros(2 * n, 6);
    let mut b = DVector::zeros(2 * n);
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let (x, y) = sn.apply(s);
        let (u, v) = dn.apply(d);
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        b[r] = u;
        b[r + 1] = v;
    }

    let p = solve_full_rank(a, b, "affine")?;
    let h_norm = Matrix3::new(p[0], p[1], p[2], p[3], p[4], p[5], 0.0, 0.0, 1.0);
    denormalize(h_norm, &sn, &dn)
}

/// Fit an 8-parameter projective map (homography) sending `src[i]` to `dst[i]`.
///
/// # Errors
///
/// Returns [`TransformError::DegenerateInput`] for fewer than 4 points or a
/// configuration that does not fix all eight parameters.
pub fn fit_projective(src: &[Point2D], dst: &[Point2D]) -> TransformResult<Transform> {
    check_pairs(src, dst, 4, "projective")?;
    let sn = Normalization::of(src)?;
    let dn = Normalization::of(dst)?;

    let n = src.len();
    let mut a = DMatrix::zeros(2 * n, 8);
    let mut b = DVector::zeros(2 * n);
    for (i, (s, d)) in src.iter().zip(dst).enumerate() {
        let (x, y) = sn.apply(s);
        let (u, v) = dn.apply(d);
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -x * u;
        a[(r, 7)] = -y * u;
        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -x * v;
        a[(r + 1, 7)] = -y * v;
        b[r] = u;
        b[r + 1] = v;
    }

    let p = solve_full_rank(a, b, "projective")?;
    let h_norm = Matrix3::new(p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7], 1.0);
    denormalize(h_norm, &sn, &dn)
}
