//! One dimensional peak picking on a smoothed trace.
//!
//! The detector treats the peak-shape step as a black box behind
//! [`PeakShapeDetector`]; [`LocalMaximaPeakShape`] is the implementation used
//! unless the caller brings its own.

use crate::models::chromatogram::{
    self,
    trapezoid_area,
};
use crate::models::{
    ChromPoint,
    EdgePoint,
    PeakSpot,
    SeparationAxis,
};

/// A candidate peak on a smoothed trace. Indices refer to the trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    pub left: usize,
    pub apex: usize,
    pub right: usize,
    pub left_intensity: f64,
    pub apex_intensity: f64,
    pub right_intensity: f64,
    pub area: f64,
}

impl PeakCandidate {
    /// Height of the apex above the higher of the two edges.
    pub fn edge_drop(&self) -> f64 {
        self.apex_intensity - self.left_intensity.max(self.right_intensity)
    }

    pub fn num_points(&self) -> usize {
        self.right - self.left + 1
    }

    /// Builds a spot from this candidate on the chromatogram it was picked from.
    ///
    /// `smoothed` is the trace the candidate refers to and `noise` its noise level.
    pub fn to_spot(
        &self,
        points: &[ChromPoint],
        smoothed: &[f64],
        noise: f64,
        axis: SeparationAxis,
    ) -> PeakSpot {
        let edge = |idx: usize| EdgePoint {
            time: points[idx].time,
            intensity: smoothed[idx],
            scan: points[idx].scan,
        };
        let times = chromatogram::times(points);
        let area_above_zero = trapezoid_area(&times, smoothed, self.left, self.right);
        let baseline = (smoothed[self.left] + smoothed[self.right])
            * 0.5
            * (times[self.right] - times[self.left]);
        let drop = (self.apex_intensity - self.left_intensity)
            .max(self.apex_intensity - self.right_intensity);

        PeakSpot {
            id: 0,
            mass: points[self.apex].mz,
            axis,
            left: edge(self.left),
            apex: edge(self.apex),
            right: edge(self.right),
            area_above_zero,
            area_above_baseline: area_above_zero - baseline,
            signal_to_noise: drop / noise,
            amplitude_score: 0.0,
            ms2_scan: None,
            isotope: None,
            drift_spots: Vec::new(),
        }
    }
}

pub trait PeakShapeDetector: Sync {
    /// Returns the candidate peaks of `smoothed` (sampled at `times`) with at least
    /// `min_datapoints` samples and an apex at least `min_amplitude` above its lower edge.
    fn detect(
        &self,
        times: &[f64],
        smoothed: &[f64],
        min_datapoints: usize,
        min_amplitude: f64,
    ) -> Vec<PeakCandidate>;
}

/// Local maxima delimited by the strictly descending runs on both sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMaximaPeakShape;

impl PeakShapeDetector for LocalMaximaPeakShape {
    fn detect(
        &self,
        times: &[f64],
        smoothed: &[f64],
        min_datapoints: usize,
        min_amplitude: f64,
    ) -> Vec<PeakCandidate> {
        let n = smoothed.len();
        let mut out = Vec::new();
        if n < 3 || times.len() != n {
            return out;
        }

        let mut i = 1;
        while i + 1 < n {
            if !(smoothed[i] > smoothed[i - 1] && smoothed[i] >= smoothed[i + 1]) {
                i += 1;
                continue;
            }

            // Flat tops keep the first sample as apex and descend from the last one.
            let apex = i;
            let mut top_end = i;
            while top_end + 1 < n && smoothed[top_end + 1] == smoothed[apex] {
                top_end += 1;
            }

            let mut left = apex;
            while left > 0 && smoothed[left - 1] < smoothed[left] {
                left -= 1;
            }
            let mut right = top_end;
            while right + 1 < n && smoothed[right + 1] < smoothed[right] {
                right += 1;
            }

            let candidate = PeakCandidate {
                left,
                apex,
                right,
                left_intensity: smoothed[left],
                apex_intensity: smoothed[apex],
                right_intensity: smoothed[right],
                area: trapezoid_area(times, smoothed, left, right),
            };
            let lowest_edge = candidate.left_intensity.min(candidate.right_intensity);
            if candidate.num_points() >= min_datapoints
                && candidate.apex_intensity - lowest_edge >= min_amplitude
            {
                out.push(candidate);
            }

            i = right.max(i + 1);
        }
        out
    }
}
