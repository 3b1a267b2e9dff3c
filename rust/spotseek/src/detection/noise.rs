//! Noise estimation around chromatographic peaks.

use super::peak_shape::PeakCandidate;
use arrayvec::ArrayVec;

/// Maximum number of samples walked outward from a peak edge when collecting spikes.
pub const NOISE_TRACKING_WINDOW_CAP: usize = 50;

/// A spike pair counts as noisy when its height is at least this fraction of the
/// peak's edge-to-apex drop.
pub const NOISE_SPIKE_RATIO: f64 = 0.3;

/// A peak with this many noisy spike pairs (both sides together) is baseline noise.
pub const NOISE_SPIKE_MAX_COUNT: usize = 3;

/// Noise estimates never go below this intensity.
pub const MIN_NOISE_LEVEL: f64 = 1.0;

/// Median absolute difference between neighbouring samples, floored at [`MIN_NOISE_LEVEL`].
pub fn estimate_noise(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return MIN_NOISE_LEVEL;
    }
    let mut diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    diffs.sort_by(|a, b| a.total_cmp(b));
    let mid = diffs.len() / 2;
    let median = if diffs.len() % 2 == 0 {
        (diffs[mid - 1] + diffs[mid]) * 0.5
    } else {
        diffs[mid]
    };
    median.max(MIN_NOISE_LEVEL)
}

/// Values of the turning points (alternating local maxima and minima) met while
/// walking outward from `start`, one sample at a time in direction `step`.
fn turning_points(values: &[f64], start: usize, step: isize, window: usize) -> ArrayVec<f64, NOISE_TRACKING_WINDOW_CAP> {
    let mut out = ArrayVec::new();
    let mut direction = 0.0f64;
    let mut prev = values[start];
    let mut idx = start as isize;

    for _ in 0..window {
        idx += step;
        if idx < 0 || idx as usize >= values.len() {
            break;
        }
        let current = values[idx as usize];
        let diff = current - prev;
        if diff != 0.0 {
            let new_direction = diff.signum();
            if direction != 0.0 && new_direction != direction && !out.is_full() {
                out.push(prev);
            }
            direction = new_direction;
        }
        prev = current;
    }
    out
}

fn count_noisy_spikes(spikes: &[f64], threshold: f64) -> usize {
    spikes
        .windows(2)
        .filter(|w| (w[0] - w[1]).abs() >= threshold)
        .count()
}

/// True when the baseline around `candidate` is as spiky as the peak itself.
pub fn is_baseline_noise(smoothed: &[f64], candidate: &PeakCandidate) -> bool {
    let amplitude = candidate.edge_drop();
    if amplitude <= 0.0 {
        return true;
    }
    let threshold = amplitude * NOISE_SPIKE_RATIO;
    let window = candidate.num_points().min(NOISE_TRACKING_WINDOW_CAP);

    let left = turning_points(smoothed, candidate.left, -1, window);
    let right = turning_points(smoothed, candidate.right, 1, window);
    let noisy = count_noisy_spikes(&left, threshold) + count_noisy_spikes(&right, threshold);
    noisy >= NOISE_SPIKE_MAX_COUNT
}
