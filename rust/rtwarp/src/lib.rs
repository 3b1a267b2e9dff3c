//! Piecewise-linear retention time warping.
//!
//! A [`DifferenceCurve`] maps an observed retention time to the retention time
//! difference measured on a handful of anchor compounds (observed - reference).
//! The curve is fitted once from the anchors and then evaluated for every scan
//! of a run.
//!
//! Boundary behaviour is explicit: before the first anchor the curve can hold
//! the first difference or start from a user supplied intercept at RT 0, and
//! after the last anchor it can hold the last difference up to the end of the
//! run. Without a boundary point the outermost segment is extrapolated.

use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

/// Minimum denominator for slope calculations to avoid division by zero.
const MIN_SLOPE_DENOMINATOR: f64 = 1e-9;

/// Errors raised while fitting a difference curve.
#[derive(Debug, Clone, PartialEq)]
pub enum RtWarpError {
    /// Returned when a curve is fitted with no anchor points.
    NoPoints,
    /// Returned when the x and y arrays handed over have different lengths.
    MismatchedLengths { x: usize, y: usize },
    /// Returned when an anchor coordinate is NaN or infinite.
    NonFinite(f64),
}

impl std::fmt::Display for RtWarpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPoints => write!(f, "No anchor points to fit a curve"),
            Self::MismatchedLengths { x, y } => {
                write!(f, "Expected x and y of the same length, got {} and {}", x, y)
            }
            Self::NonFinite(v) => write!(f, "Non-finite anchor coordinate: {}", v),
        }
    }
}

/// A single anchor on the observed-RT / RT-difference plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// What the curve does before the first anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LeadingExtrapolation {
    /// Insert a synthetic anchor at RT 0 holding the first anchor's difference.
    #[default]
    HoldFirstPoint,
    /// Insert a synthetic anchor at RT 0 with the given difference.
    UserIntercept(f64),
    /// Extrapolate the first segment.
    None,
}

/// What the curve does after the last anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TrailingExtrapolation {
    /// Insert a synthetic anchor at the end of the run holding the last difference.
    #[default]
    HoldLastPoint,
    /// Extrapolate the last segment.
    None,
}

/// Fitted piecewise-linear RT difference curve.
///
/// Holds the anchors sorted by x and the precomputed slope of every segment.
/// Always has at least two anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferenceCurve {
    points: Vec<Point>,
    slopes: Vec<f64>,
}

impl DifferenceCurve {
    /// Fits a curve from anchor points.
    ///
    /// `run_end` is the last acquisition time of the run, used by
    /// [`TrailingExtrapolation::HoldLastPoint`].
    ///
    /// # Example
    /// ```
    /// use rtwarp::{DifferenceCurve, LeadingExtrapolation, Point, TrailingExtrapolation};
    ///
    /// let anchors = vec![Point { x: 2.0, y: -0.1 }, Point { x: 8.0, y: 0.2 }];
    /// let curve = DifferenceCurve::fit(
    ///     &anchors,
    ///     LeadingExtrapolation::HoldFirstPoint,
    ///     TrailingExtrapolation::HoldLastPoint,
    ///     10.0,
    /// )
    /// .unwrap();
    /// assert!((curve.predict(5.0) - 0.05).abs() < 1e-9);
    /// assert!((curve.predict(0.0) + 0.1).abs() < 1e-9);
    /// ```
    pub fn fit(
        anchors: &[Point],
        leading: LeadingExtrapolation,
        trailing: TrailingExtrapolation,
        run_end: f64,
    ) -> Result<Self, RtWarpError> {
        if anchors.is_empty() {
            return Err(RtWarpError::NoPoints);
        }
        for p in anchors {
            if !p.x.is_finite() {
                return Err(RtWarpError::NonFinite(p.x));
            }
            if !p.y.is_finite() {
                return Err(RtWarpError::NonFinite(p.y));
            }
        }

        let mut points = anchors.to_vec();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));

        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Err(RtWarpError::NoPoints);
        };

        match leading {
            LeadingExtrapolation::HoldFirstPoint if first.x > 0.0 => {
                points.insert(0, Point { x: 0.0, y: first.y });
            }
            LeadingExtrapolation::UserIntercept(intercept) if first.x > 0.0 => {
                points.insert(0, Point { x: 0.0, y: intercept });
            }
            _ => {}
        }

        if let TrailingExtrapolation::HoldLastPoint = trailing {
            if run_end.is_finite() && last.x < run_end {
                points.push(Point { x: run_end, y: last.y });
            }
        }

        if points.len() == 1 {
            debug!("Single anchor left, duplicating it at RT 0");
            points.insert(0, Point { x: 0.0, y: first.y });
        }

        Ok(Self::from_sorted(points))
    }

    /// Fits a curve from parallel x/y arrays.
    pub fn fit_xy(
        x: &[f64],
        y: &[f64],
        leading: LeadingExtrapolation,
        trailing: TrailingExtrapolation,
        run_end: f64,
    ) -> Result<Self, RtWarpError> {
        if x.len() != y.len() {
            return Err(RtWarpError::MismatchedLengths {
                x: x.len(),
                y: y.len(),
            });
        }
        let anchors: Vec<Point> = x
            .iter()
            .zip(y.iter())
            .map(|(&x, &y)| Point { x, y })
            .collect();
        Self::fit(&anchors, leading, trailing, run_end)
    }

    fn from_sorted(points: Vec<Point>) -> Self {
        let slopes = points
            .windows(2)
            .map(|p| (p[1].y - p[0].y) / (p[1].x - p[0].x).max(MIN_SLOPE_DENOMINATOR))
            .collect();
        Self { points, slopes }
    }

    /// The anchors of the curve, including synthetic boundary anchors.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Evaluates the curve at `x_val`.
    ///
    /// Inside the anchored range this is linear interpolation between the two
    /// surrounding anchors; outside it the boundary segment is extended.
    pub fn predict(&self, x_val: f64) -> f64 {
        // Find the partition point; first element >= x_val.
        let i = self.points.partition_point(|p| p.x < x_val);
        let i = i.clamp(1, self.slopes.len());
        self.predict_with_index(x_val, i)
    }

    /// Evaluates the curve for every value in `xs`.
    pub fn predict_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Linear interpolation using the precomputed slope of segment `i - 1`.
    ///
    /// `i` must satisfy `1 <= i <= slopes.len()`.
    fn predict_with_index(&self, x_val: f64, i: usize) -> f64 {
        debug_assert!(
            i > 0 && i <= self.slopes.len(),
            "Index {} out of valid range [1, {}] for interpolation",
            i,
            self.slopes.len()
        );
        let p1 = self.points[i - 1];
        let slope = self.slopes[i - 1];
        p1.y + (x_val - p1.x) * slope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point { x, y }).collect()
    }

    #[test]
    fn test_interpolates_between_anchors() {
        let curve = DifferenceCurve::fit(
            &pts(&[(8.0, 0.2), (2.0, -0.1)]),
            LeadingExtrapolation::HoldFirstPoint,
            TrailingExtrapolation::HoldLastPoint,
            10.0,
        )
        .unwrap();
        assert_eq!(curve.points().len(), 4);
        assert!((curve.predict(5.0) - 0.05).abs() < 1e-12);
        assert!((curve.predict(1.0) + 0.1).abs() < 1e-12);
        assert!((curve.predict(9.5) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_user_intercept() {
        let curve = DifferenceCurve::fit(
            &pts(&[(2.0, 0.4)]),
            LeadingExtrapolation::UserIntercept(0.0),
            TrailingExtrapolation::None,
            10.0,
        )
        .unwrap();
        assert!((curve.predict(0.0)).abs() < 1e-12);
        assert!((curve.predict(1.0) - 0.2).abs() < 1e-12);
        // Last segment is extended.
        assert!((curve.predict(4.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_single_anchor_is_duplicated() {
        let curve = DifferenceCurve::fit(
            &pts(&[(3.0, 0.3)]),
            LeadingExtrapolation::None,
            TrailingExtrapolation::None,
            10.0,
        )
        .unwrap();
        assert_eq!(curve.points().len(), 2);
        assert!((curve.predict(7.0) - 0.3).abs() < 1e-12);
        assert!((curve.predict(-1.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_lengths() {
        let res = DifferenceCurve::fit_xy(
            &[1.0, 2.0],
            &[0.1],
            LeadingExtrapolation::None,
            TrailingExtrapolation::None,
            5.0,
        );
        assert_eq!(res.unwrap_err(), RtWarpError::MismatchedLengths { x: 2, y: 1 });
    }

    #[test]
    fn test_rejects_non_finite() {
        let res = DifferenceCurve::fit(
            &pts(&[(1.0, f64::NAN)]),
            LeadingExtrapolation::None,
            TrailingExtrapolation::None,
            5.0,
        );
        assert!(matches!(res, Err(RtWarpError::NonFinite(_))));
    }
}
