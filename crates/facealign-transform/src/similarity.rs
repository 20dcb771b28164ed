//! Least-squares similarity fit (Umeyama)
//!
//! Finds the scale `s`, rotation `R` and translation `t` minimizing
//! `sum |dst_i - (s R src_i + t)|^2`. The rotation is forced to be proper,
//! so the fitted map never mirrors.
//!
//! # Reference
//!
//! S. Umeyama, "Least-squares estimation of transformation parameters
//! between two point patterns", IEEE PAMI 13(4), 1991.

use crate::matrix::Transform;
use crate::{TransformError, TransformResult};
use facealign_core::Point2D;
use nalgebra::{Matrix2, Matrix3, Vector2};

/// Relative tolerance on the point spread.
const SPREAD_EPS: f64 = 1e-12;

/// Ratio of smallest to largest covariance singular value below which the
/// configuration is treated as collinear.
const COLLINEAR_RATIO: f64 = 1e-9;

/// Smallest accepted scale.
const MIN_SCALE: f64 = 1e-12;

fn centroid(points: &[Point2D]) -> Vector2<f64> {
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + Vector2::new(p.x, p.y));
    sum / points.len() as f64
}

/// Mean squared distance from the centroid.
fn spread(points: &[Point2D], mean: &Vector2<f64>) -> f64 {
    points
        .iter()
        .map(|p| (Vector2::new(p.x, p.y) - mean).norm_squared())
        .sum::<f64>()
        / points.len() as f64
}

fn check_spread(var: f64, mean: &Vector2<f64>, which: &str) -> TransformResult<()> {
    if !(var > SPREAD_EPS * (1.0 + mean.norm_squared())) {
        return Err(TransformError::DegenerateInput(format!(
            "{which} points coincide (spread {var:e})"
        )));
    }
    Ok(())
}

/// Fit a similarity mapping `src[i]` onto `dst[i]`.
///
/// Both slices must have the same length of at least 2. With exactly two
/// points the fit is exact. With three or more, collinear configurations
/// are rejected since they cannot fix the rotation robustly.
///
/// # Errors
///
/// Returns [`TransformError::DegenerateInput`] if either set has coincident
/// points, the configuration is collinear, or the scale is not positive.
pub fn fit_similarity(src: &[Point2D], dst: &[Point2D]) -> TransformResult<Transform> {
    let n = src.len();
    if n < 2 || dst.len() != n {
        return Err(TransformError::DegenerateInput(format!(
            "similarity fit needs at least 2 paired points, got {} and {}",
            n,
            dst.len()
        )));
    }

    let mu_src = centroid(src);
    let mu_dst = centroid(dst);
    let var_src = spread(src, &mu_src);
    check_spread(var_src, &mu_src, "observed")?;
    check_spread(spread(dst, &mu_dst), &mu_dst, "reference")?;

    // Cross-covariance (1/n) sum dst_c * src_c^T
    let mut sigma = Matrix2::zeros();
    for (s, d) in src.iter().zip(dst) {
        let sc = Vector2::new(s.x, s.y) - mu_src;
        let dc = Vector2::new(d.x, d.y) - mu_dst;
        sigma += dc * sc.transpose();
    }
    sigma /= n as f64;

    let svd = sigma.svd(true, true);
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(TransformError::DegenerateInput(
                "covariance decomposition failed".to_string(),
            ));
        }
    };
    let sv = svd.singular_values;
    let (i_max, i_min) = if sv[0] >= sv[1] { (0, 1) } else { (1, 0) };
    if n >= 3 && !(sv[i_min] > COLLINEAR_RATIO * sv[i_max]) {
        return Err(TransformError::DegenerateInput(format!(
            "collinear configuration (singular values {:e}, {:e})",
            sv[i_max], sv[i_min]
        )));
    }

    // Reflection correction on the weakest direction
    let mut d = Vector2::new(1.0, 1.0);
    if u.determinant() * v_t.determinant() < 0.0 {
        d[i_min] = -1.0;
    }
    let r = u * Matrix2::from_diagonal(&d) * v_t;

    let scale = sv.dot(&d) / var_src;
    if !scale.is_finite() || scale <= MIN_SCALE {
        return Err(TransformError::DegenerateInput(format!(
            "fitted scale {scale:e} is not positive"
        )));
    }

    let sr = r * scale;
    let t = mu_dst - sr * mu_src;
    Transform::from_matrix(Matrix3::new(
        sr[(0, 0)],
        sr[(0, 1)],
        t.x,
        sr[(1, 0)],
        sr[(1, 1)],
        t.y,
        0.0,
        0.0,
        1.0,
    ))
}
