//! Transform estimation regression test
//!
//! Covers identity recovery, similarity and projective round trips against
//! the ArcFace template, the no-mirroring guarantee, degenerate inputs and
//! determinism across threads.

use facealign_core::{LandmarkSet, Point2D, Template};
use facealign_test::RegParams;
use facealign_test::fixtures::{moved_template_landmarks, similarity_point};
use facealign_transform::{Transform, TransformError, TransformModel, estimate, estimate_with};
use quickcheck_macros::quickcheck;

#[test]
fn estimate_reg_identity() {
    let mut rp = RegParams::new("estimate_identity");

    let template = Template::arcface_112();
    let observed = LandmarkSet::new(template.points().to_vec()).expect("landmarks");
    let t = estimate(&observed, &template).expect("estimate");

    let p = t.similarity_params().expect("affine result");
    rp.compare_values(1.0, p.scale, 1e-9);
    rp.compare_values(0.0, p.rotation, 1e-9);
    rp.compare_values(0.0, p.tx, 1e-7);
    rp.compare_values(0.0, p.ty, 1e-7);
    rp.compare_values(0.0, t.rms_error(observed.points(), template.points()), 1e-9);

    assert!(rp.cleanup(), "estimate_identity regression test failed");
}

/// Template scaled by 0.8, rotated 10 degrees and moved to (40, 30).
#[test]
fn estimate_reg_scaled_rotated_template() {
    let mut rp = RegParams::new("estimate_scaled_rotated");

    let template = Template::arcface_112();
    let observed = moved_template_landmarks(0.8, 10.0, 40.0, 30.0);
    let t = estimate(&observed, &template).expect("estimate");

    // observed -> canonical undoes the move
    let p = t.similarity_params().expect("affine result");
    rp.compare_values(1.25, p.scale, 1e-9);
    rp.compare_values(-10.0, p.rotation_degrees(), 1e-7);

    // forward direction recovers the move itself
    let forward = t.inverse().expect("inverse");
    let f = forward.similarity_params().expect("affine result");
    rp.compare_values(0.8, f.scale, 1e-9);
    rp.compare_values(10.0, f.rotation_degrees(), 1e-7);
    rp.compare_values(40.0, f.tx, 1e-7);
    rp.compare_values(30.0, f.ty, 1e-7);

    let mapped: Vec<Point2D> = observed
        .iter()
        .map(|&pt| t.apply(pt).expect("finite"))
        .collect();
    rp.compare_points(template.points(), &mapped, 1e-7);

    assert!(rp.cleanup(), "estimate_scaled_rotated regression test failed");
}

#[test]
fn estimate_reg_affine_and_projective_models() {
    let mut rp = RegParams::new("estimate_models");

    let template = Template::arcface_112();
    let g = Transform::from_rows([
        [0.85, 0.12, 30.0],
        [-0.05, 0.95, 18.0],
        [0.0006, -0.0004, 1.0],
    ])
    .expect("matrix");
    let observed = LandmarkSet::new(
        template
            .points()
            .iter()
            .map(|&p| g.apply(p).expect("finite"))
            .collect(),
    )
    .expect("landmarks");

    let proj = estimate_with(&observed, template.points(), TransformModel::Projective)
        .expect("projective fit");
    rp.compare_values(1.0, proj.matrix()[(2, 2)], 1e-12);
    rp.compare_values(0.0, proj.rms_error(observed.points(), template.points()), 1e-6);
    // recovers the inverse of g
    let round = proj.compose(&g);
    for point in [Point2D::new(0.0, 0.0), Point2D::new(111.0, 111.0), Point2D::new(60.0, 20.0)] {
        let back = round.apply(point).expect("finite");
        rp.compare_values(0.0, back.distance(&point), 1e-5);
    }

    let affine = estimate_with(&observed, template.points(), TransformModel::Affine)
        .expect("affine fit");
    rp.compare_values(1.0, if affine.is_affine() { 1.0 } else { 0.0 }, 0.0);
    // affine cannot absorb the perspective part, but gets close
    rp.compare_values(0.0, affine.rms_error(observed.points(), template.points()), 2.0);

    assert!(rp.cleanup(), "estimate_models regression test failed");
}

#[test]
fn estimate_reg_never_mirrors() {
    let mut rp = RegParams::new("estimate_no_mirror");

    let template = Template::arcface_112();
    // horizontally flipped face
    let mirrored = LandmarkSet::new(
        template
            .points()
            .iter()
            .map(|p| Point2D::new(200.0 - p.x, p.y))
            .collect(),
    )
    .expect("landmarks");
    let t = estimate(&mirrored, &template).expect("estimate");
    rp.compare_values(1.0, t.linear_determinant().signum(), 0.0);
    rp.compare_values(1.0, if t.is_orientation_preserving() { 1.0 } else { 0.0 }, 0.0);

    // free models could fit the flip exactly, so they refuse instead
    for model in [TransformModel::Affine, TransformModel::Projective] {
        let rejected = matches!(
            estimate_with(&mirrored, template.points(), model),
            Err(TransformError::DegenerateInput(_))
        );
        rp.compare_values(1.0, if rejected { 1.0 } else { 0.0 }, 0.0);
    }

    assert!(rp.cleanup(), "estimate_no_mirror regression test failed");
}

#[test]
fn estimate_reg_degenerate_inputs() {
    let template = Template::arcface_112();

    let collinear = LandmarkSet::from_pairs(&[
        [10.0, 10.0],
        [20.0, 20.0],
        [30.0, 30.0],
        [40.0, 40.0],
        [50.0, 50.0],
    ])
    .expect("landmarks");
    for model in [TransformModel::Similarity, TransformModel::Affine, TransformModel::Projective] {
        assert!(
            matches!(
                estimate_with(&collinear, template.points(), model),
                Err(TransformError::DegenerateInput(_))
            ),
            "collinear input accepted by {model:?}"
        );
    }

    // collinear reference with well-spread observations
    let observed = LandmarkSet::new(template.points().to_vec()).expect("landmarks");
    let line: Vec<Point2D> = (1..=5)
        .map(|i| Point2D::new(10.0 * i as f64, 10.0 * i as f64))
        .collect();
    for model in [TransformModel::Similarity, TransformModel::Affine, TransformModel::Projective] {
        assert!(
            matches!(
                estimate_with(&observed, &line, model),
                Err(TransformError::DegenerateInput(_))
            ),
            "collinear reference accepted by {model:?}"
        );
    }

    let coincident = LandmarkSet::from_pairs(&[[5.0, 5.0]; 5]).expect("landmarks");
    assert!(matches!(
        estimate(&coincident, &template),
        Err(TransformError::DegenerateInput(_))
    ));

    let short = LandmarkSet::from_pairs(&[[1.0, 2.0], [3.0, 4.0]]).expect("landmarks");
    assert!(matches!(
        estimate(&short, &template),
        Err(TransformError::Core(_))
    ));
}

#[test]
fn estimate_reg_deterministic_across_threads() {
    let template = Template::arcface_112();
    let observed = moved_template_landmarks(1.7, -23.0, 310.5, 122.25);
    let reference = estimate(&observed, &template).expect("estimate").to_rows();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let template = template.clone();
            let observed = observed.clone();
            std::thread::spawn(move || estimate(&observed, &template).map(|t| t.to_rows()))
        })
        .collect();
    for handle in handles {
        let rows = handle.join().expect("thread").expect("estimate");
        for (a, b) in rows.iter().flatten().zip(reference.iter().flatten()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

/// Any proper similarity applied to the template is undone exactly.
#[quickcheck]
fn estimate_recovers_random_similarity(scale_q: u8, angle_q: i8, tx: i16, ty: i16) -> bool {
    let scale = 0.25 + scale_q as f64 / 64.0;
    let angle = angle_q as f64 * 1.4;
    let (tx, ty) = (tx as f64 / 50.0, ty as f64 / 50.0);

    let template = Template::arcface_112();
    let points: Vec<Point2D> = template
        .points()
        .iter()
        .map(|&p| similarity_point(p, scale, angle, tx, ty))
        .collect();
    let observed = match LandmarkSet::new(points) {
        Ok(o) => o,
        Err(_) => return false,
    };
    match estimate(&observed, &template) {
        Ok(t) => {
            t.linear_determinant() > 0.0
                && t.rms_error(observed.points(), template.points()) < 1e-6
                && t.similarity_params()
                    .is_some_and(|p| (p.scale * scale - 1.0).abs() < 1e-9)
        }
        Err(_) => false,
    }
}
