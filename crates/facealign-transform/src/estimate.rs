//! Transform estimation from landmark correspondences
//!
//! Computes the transform mapping observed landmark coordinates onto the
//! canonical template. The similarity model is the default: it removes
//! in-plane rotation, scale and position without distorting the face.

use crate::lsq::{fit_affine, fit_projective};
use crate::matrix::Transform;
use crate::similarity::fit_similarity;
use crate::{TransformError, TransformResult};
use facealign_core::{Error as CoreError, LandmarkSet, Point2D, Template};

/// Degrees of freedom of the fitted transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformModel {
    /// Rotation, uniform scale and translation (4 DOF)
    #[default]
    Similarity,
    /// Full affine map (6 DOF)
    Affine,
    /// Homography (8 DOF)
    Projective,
}

impl TransformModel {
    /// Minimum number of correspondences the model needs.
    pub fn min_points(self) -> usize {
        match self {
            TransformModel::Similarity => 2,
            TransformModel::Affine => 3,
            TransformModel::Projective => 4,
        }
    }
}

/// Estimate the similarity transform mapping `observed` onto `reference`.
///
/// # Errors
///
/// - [`TransformError::Core`] with a cardinality mismatch if the set and the
///   template have different lengths
/// - [`TransformError::DegenerateInput`] if the points do not determine the
///   transform (coincident or collinear points, non-positive scale)
///
/// # Examples
///
/// ```
/// use facealign_core::{LandmarkSet, Template};
/// use facealign_transform::estimate;
///
/// let template = Template::arcface_112();
/// let observed = LandmarkSet::new(template.points().to_vec()).unwrap();
/// let t = estimate(&observed, &template).unwrap();
/// assert!((t.similarity_params().unwrap().scale - 1.0).abs() < 1e-9);
/// ```
pub fn estimate(observed: &LandmarkSet, reference: &Template) -> TransformResult<Transform> {
    estimate_with(observed, reference.points(), TransformModel::Similarity)
}

/// Estimate a transform of the given model mapping `observed` onto `reference`.
///
/// # Arguments
///
/// * `observed` - Landmarks in source image coordinates
/// * `reference` - Canonical points, same order and length
/// * `model` - Degrees of freedom of the fit
///
/// # Errors
///
/// As [`estimate`]. Additionally, affine and projective fits whose linear
/// part would mirror the image, or that collapse the plane onto a line,
/// return [`TransformError::DegenerateInput`].
pub fn estimate_with(
    observed: &LandmarkSet,
    reference: &[Point2D],
    model: TransformModel,
) -> TransformResult<Transform> {
    observed.ensure_len(reference.len())?;
    if let Some(index) = reference.iter().position(|p| !p.is_finite()) {
        return Err(CoreError::NonFiniteCoordinate { index }.into());
    }

    let result = if observed.len() < model.min_points() {
        Err(TransformError::DegenerateInput(format!(
            "{model:?} model needs at least {} points, got {}",
            model.min_points(),
            observed.len()
        )))
    } else {
        match model {
            TransformModel::Similarity => fit_similarity(observed.points(), reference),
            TransformModel::Affine => fit_affine(observed.points(), reference),
            TransformModel::Projective => fit_projective(observed.points(), reference),
        }
        .and_then(ensure_orientation)
    };

    match &result {
        Ok(t) => match t.similarity_params() {
            Some(p) => tracing::debug!(
                ?model,
                points = observed.len(),
                scale = p.scale,
                angle_deg = p.rotation_degrees(),
                "transform estimated"
            ),
            None => tracing::debug!(?model, points = observed.len(), "transform estimated"),
        },
        Err(e) => tracing::warn!(
            ?model,
            points = observed.len(),
            error = %e,
            "transform estimate rejected"
        ),
    }
    result
}

/// Affine and projective fits follow mirrored landmarks; a face must
/// never come out flipped.
fn ensure_orientation(t: Transform) -> TransformResult<Transform> {
    if t.is_orientation_preserving() {
        Ok(t)
    } else {
        Err(TransformError::DegenerateInput(
            "landmarks are mirrored relative to the reference".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_estimate() {
        let template = Template::arcface_112();
        let observed = LandmarkSet::new(template.points().to_vec()).unwrap();
        let t = estimate(&observed, &template).unwrap();
        let rows = t.to_rows();
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        for (r, e) in rows.iter().flatten().zip(identity.iter().flatten()) {
            assert_relative_eq!(*r, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cardinality_mismatch() {
        let template = Template::arcface_112();
        let observed = LandmarkSet::new(template.points()[..4].to_vec()).unwrap();
        match estimate(&observed, &template) {
            Err(TransformError::Core(CoreError::CardinalityMismatch { expected, actual })) => {
                assert_eq!((expected, actual), (5, 4));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_too_few_for_model() {
        let reference = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)];
        let observed = LandmarkSet::new(reference.to_vec()).unwrap();
        assert!(estimate_with(&observed, &reference, TransformModel::Affine).is_ok());
        assert!(matches!(
            estimate_with(&observed, &reference, TransformModel::Projective),
            Err(TransformError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_non_finite_reference() {
        let reference = [Point2D::new(0.0, 0.0), Point2D::new(f64::NAN, 0.0)];
        let observed = LandmarkSet::from_pairs(&[[0.0, 0.0], [1.0, 0.0]]).unwrap();
        assert!(matches!(
            estimate_with(&observed, &reference, TransformModel::Similarity),
            Err(TransformError::Core(CoreError::NonFiniteCoordinate { index: 1 }))
        ));
    }

    #[test]
    fn test_mirrored_rejected_by_free_models() {
        let reference = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 12.0),
        ];
        let flipped: Vec<Point2D> = reference.iter().map(|p| Point2D::new(-p.x, p.y)).collect();
        let observed = LandmarkSet::new(flipped).unwrap();
        for model in [TransformModel::Affine, TransformModel::Projective] {
            assert!(matches!(
                estimate_with(&observed, &reference, model),
                Err(TransformError::DegenerateInput(_))
            ));
        }
        assert!(estimate_with(&observed, &reference, TransformModel::Similarity).is_ok());
    }

    #[test]
    fn test_model_default() {
        assert_eq!(TransformModel::default(), TransformModel::Similarity);
        assert_eq!(TransformModel::Projective.min_points(), 4);
    }
}
