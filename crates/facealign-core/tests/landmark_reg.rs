//! Landmark and template regression test
//!
//! Detector output arrives as `float[n][cols]` rows; only the first two
//! columns are coordinates. Validation covers cardinality and finiteness.

use facealign_core::{Error, FIVE_POINT_COUNT, LandmarkSet, Point2D, Template};
use facealign_test::RegParams;

#[test]
fn landmark_reg_detector_rows() {
    let mut rp = RegParams::new("landmark_rows");

    // x, y, score
    let rows: Vec<Vec<f32>> = vec![
        vec![38.5, 51.0, 0.99],
        vec![73.0, 51.5, 0.98],
        vec![56.0, 72.0, 0.97],
        vec![41.5, 92.0, 0.95],
        vec![70.5, 92.5, 0.96],
    ];
    let set = LandmarkSet::from_rows(&rows).expect("rows");
    rp.compare_values(FIVE_POINT_COUNT as f64, set.len() as f64, 0.0);
    rp.compare_points(
        &[Point2D::new(38.5, 51.0), Point2D::new(70.5, 92.5)],
        &[set.points()[0], set.points()[4]],
        0.0,
    );

    let template = Template::arcface_112();
    rp.compare_values(0.0, if set.ensure_len(template.len()).is_ok() { 0.0 } else { 1.0 }, 0.0);

    let c = set.centroid();
    rp.compare_values(55.9, c.x, 1e-5);
    rp.compare_values(71.8, c.y, 1e-5);

    assert!(rp.cleanup(), "landmark_rows regression test failed");
}

#[test]
fn landmark_reg_rejects_bad_input() {
    assert!(matches!(
        LandmarkSet::from_pairs(&[[1.0, f32::NAN]]),
        Err(Error::NonFiniteCoordinate { index: 0 })
    ));
    assert!(matches!(
        LandmarkSet::from_rows(&[]),
        Err(Error::InvalidParameter(_))
    ));

    let four = LandmarkSet::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])
        .expect("pairs");
    assert!(matches!(
        four.ensure_len(Template::arcface_112().len()),
        Err(Error::CardinalityMismatch { expected: 5, actual: 4 })
    ));
}

#[test]
fn landmark_reg_template_sizes() {
    let mut rp = RegParams::new("template_sizes");

    let base = Template::arcface_112();
    for size in [112u32, 224, 128, 256] {
        let t = Template::arcface(size).expect("arcface size");
        rp.compare_values(size as f64, t.width() as f64, 0.0);
        // eye height offset scales with the layout
        let eyes = t.points()[1].y - t.points()[0].y;
        let base_eyes = base.points()[1].y - base.points()[0].y;
        let ratio = if size % 112 == 0 {
            size as f64 / 112.0
        } else {
            size as f64 / 128.0
        };
        rp.compare_values(base_eyes * ratio, eyes, 1e-9);
    }

    assert!(rp.cleanup(), "template_sizes regression test failed");
}
