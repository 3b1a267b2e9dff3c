use serde::{
    Deserialize,
    Serialize,
};

/// Something that can smooth an intensity trace.
///
/// The output always has the same length as the input.
pub trait Smoother: Sync {
    fn smooth_into(&self, values: &[f64], out: &mut Vec<f64>);

    fn smooth(&self, values: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(values.len());
        self.smooth_into(values, &mut out);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingMethod {
    None,
    SimpleMovingAverage,
    #[default]
    LinearWeightedMovingAverage,
}

/// Smoothing method plus its level (half window, in samples).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smoothing {
    pub method: SmoothingMethod,
    pub level: usize,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            method: SmoothingMethod::LinearWeightedMovingAverage,
            level: 3,
        }
    }
}

impl Smoothing {
    pub fn new(method: SmoothingMethod, level: usize) -> Self {
        Self { method, level }
    }
}

impl Smoother for Smoothing {
    fn smooth_into(&self, values: &[f64], out: &mut Vec<f64>) {
        match self.method {
            SmoothingMethod::None => {
                out.clear();
                out.extend_from_slice(values);
            }
            SmoothingMethod::SimpleMovingAverage => moving_average_into(values, self.level, out),
            SmoothingMethod::LinearWeightedMovingAverage => {
                linear_weighted_moving_average_into(values, self.level, out)
            }
        }
    }
}

/// Centered moving average over `2 * level + 1` samples.
///
/// The window is truncated at the edges of the trace, so the first and last
/// `level` values average over fewer samples.
pub fn moving_average_into(values: &[f64], level: usize, out: &mut Vec<f64>) {
    out.clear();
    out.reserve(values.len());
    let n = values.len();
    for i in 0..n {
        let lo = i.saturating_sub(level);
        let hi = (i + level).min(n.saturating_sub(1));
        let window = &values[lo..=hi];
        out.push(window.iter().sum::<f64>() / window.len() as f64);
    }
}

/// Centered moving average where a neighbour at distance `d` weighs `level + 1 - d`.
pub fn linear_weighted_moving_average_into(values: &[f64], level: usize, out: &mut Vec<f64>) {
    out.clear();
    out.reserve(values.len());
    let n = values.len();
    for i in 0..n {
        let lo = i.saturating_sub(level);
        let hi = (i + level).min(n.saturating_sub(1));
        let mut sum = 0.0;
        let mut weight_sum = 0.0;
        for (j, v) in values.iter().enumerate().take(hi + 1).skip(lo) {
            let weight = (level + 1 - i.abs_diff(j)) as f64;
            sum += v * weight;
            weight_sum += weight;
        }
        out.push(sum / weight_sum);
    }
}
