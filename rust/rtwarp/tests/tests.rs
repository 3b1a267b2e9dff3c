use rtwarp::{
    DifferenceCurve,
    LeadingExtrapolation,
    Point,
    RtWarpError,
    TrailingExtrapolation,
};

#[test]
fn test_fit_empty_points() {
    // Test: Empty input should return error
    let empty: Vec<Point> = vec![];
    let result = DifferenceCurve::fit(
        &empty,
        LeadingExtrapolation::HoldFirstPoint,
        TrailingExtrapolation::HoldLastPoint,
        10.0,
    );
    assert_eq!(result.unwrap_err(), RtWarpError::NoPoints);
}

#[test]
fn test_hold_both_boundaries() {
    // Test: Two anchors held flat on both sides
    let anchors = vec![Point { x: 2.0, y: -0.1 }, Point { x: 8.0, y: 0.2 }];
    let curve = DifferenceCurve::fit(
        &anchors,
        LeadingExtrapolation::HoldFirstPoint,
        TrailingExtrapolation::HoldLastPoint,
        10.0,
    )
    .unwrap();

    assert!((curve.predict(0.0) + 0.1).abs() < 1e-12);
    assert!((curve.predict(10.0) - 0.2).abs() < 1e-12);
    assert!((curve.predict(5.0) - 0.05).abs() < 1e-12);
}

#[test]
fn test_extrapolates_without_boundary_points() {
    // Test: No boundary anchors, outer segments are extended
    let anchors = vec![
        Point { x: 2.0, y: 0.0 },
        Point { x: 4.0, y: 0.2 },
        Point { x: 6.0, y: 0.2 },
    ];
    let curve = DifferenceCurve::fit(
        &anchors,
        LeadingExtrapolation::None,
        TrailingExtrapolation::None,
        10.0,
    )
    .unwrap();

    assert_eq!(curve.points().len(), 3);
    assert!((curve.predict(0.0) + 0.2).abs() < 1e-12);
    assert!((curve.predict(9.0) - 0.2).abs() < 1e-12);
}

#[test]
fn test_predict_many_matches_predict() {
    let anchors: Vec<Point> = (0..10)
        .map(|i| Point {
            x: i as f64,
            y: (i as f64 * 0.7).sin() * 0.1,
        })
        .collect();
    let curve = DifferenceCurve::fit(
        &anchors,
        LeadingExtrapolation::None,
        TrailingExtrapolation::None,
        9.0,
    )
    .unwrap();
    let xs: Vec<f64> = (0..50).map(|i| i as f64 * 0.2).collect();
    let many = curve.predict_many(&xs);
    for (x, y) in xs.iter().zip(many.iter()) {
        assert_eq!(curve.predict(*x), *y);
    }
    // Anchors are reproduced exactly.
    for p in anchors.iter() {
        assert!((curve.predict(p.x) - p.y).abs() < 1e-12);
    }
}
