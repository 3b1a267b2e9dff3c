use crate::utils::{
    Smoothing,
    TupleRange,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A mass that should never be reported as a feature (e.g. a known contaminant).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionMass {
    pub mass: f64,
    pub tolerance: f64,
}

impl ExclusionMass {
    pub fn matches(&self, mass: f64) -> bool {
        (mass - self.mass).abs() <= self.tolerance
    }
}

/// Settings of the drift-time sub-resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftParams {
    /// Half width (minutes) of the RT window around the apex used to build a mobilogram.
    /// The window is also clipped to the peak edges.
    pub rt_half_window: f64,
    /// Multiplier applied to `min_amplitude` for drift-axis peaks.
    pub amplitude_factor: f64,
    /// Drift peaks must drop at least this fraction of the tallest drift apex to their edges.
    pub min_relative_drop: f64,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            rt_half_window: 0.1,
            amplitude_factor: 0.5,
            min_relative_drop: 0.1,
        }
    }
}

/// Parameters of the feature detector.
///
/// Times are in minutes, masses in daltons (m/z).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    pub mass_slice_width: f64,
    pub mass_range: TupleRange<f64>,
    pub rt_range: TupleRange<f64>,
    pub smoothing: Smoothing,
    pub min_datapoints: usize,
    pub min_amplitude: f64,
    /// Enables the spike based baseline-noise filter.
    pub background_subtraction: bool,
    pub exclusion_masses: Vec<ExclusionMass>,
    /// Mass tolerance of the precision pass.
    pub centroid_ms1_tolerance: f64,
    /// Precursor match tolerance when linking MS2 scans.
    pub ms2_precursor_tolerance: f64,
    pub drift: DriftParams,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            mass_slice_width: 0.1,
            mass_range: TupleRange::around(1000.0, 1000.0),
            rt_range: TupleRange::around(50.0, 50.0),
            smoothing: Smoothing::default(),
            min_datapoints: 5,
            min_amplitude: 1000.0,
            background_subtraction: true,
            exclusion_masses: Vec::new(),
            centroid_ms1_tolerance: 0.01,
            ms2_precursor_tolerance: 0.025,
            drift: DriftParams::default(),
        }
    }
}

impl DetectionParams {
    pub fn is_excluded(&self, mass: f64) -> bool {
        self.exclusion_masses.iter().any(|e| e.matches(mass))
    }
}
