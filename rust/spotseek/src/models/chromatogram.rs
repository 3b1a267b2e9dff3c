use serde::{
    Deserialize,
    Serialize,
};

/// One sample of an extracted chromatogram.
///
/// `time` is the retention time for RT chromatograms and the drift time for
/// mobilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromPoint {
    pub scan: usize,
    pub time: f64,
    pub mz: f64,
    pub intensity: f64,
}

pub fn intensities(points: &[ChromPoint]) -> Vec<f64> {
    points.iter().map(|p| p.intensity).collect()
}

pub fn times(points: &[ChromPoint]) -> Vec<f64> {
    points.iter().map(|p| p.time).collect()
}

/// Trapezoidal integral of `values` over `times` on the closed index range `[left, right]`.
pub fn trapezoid_area(times: &[f64], values: &[f64], left: usize, right: usize) -> f64 {
    if right <= left {
        return 0.0;
    }
    (left..right)
        .map(|i| (values[i] + values[i + 1]) * 0.5 * (times[i + 1] - times[i]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trapezoid_area() {
        let times = vec![0.0, 1.0, 2.0, 3.0];
        let values = vec![0.0, 2.0, 2.0, 0.0];
        assert_eq!(trapezoid_area(&times, &values, 0, 3), 4.0);
        assert_eq!(trapezoid_area(&times, &values, 1, 2), 2.0);
        assert_eq!(trapezoid_area(&times, &values, 2, 2), 0.0);
    }
}
