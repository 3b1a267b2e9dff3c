pub use rtwarp::{
    LeadingExtrapolation,
    TrailingExtrapolation,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Half window (in scans) of the moving average applied to the RT difference curve.
pub const RT_DIFFERENCE_SMOOTHING_LEVEL: usize = 50;

/// Minimum step between consecutive corrected retention times.
pub const MIN_RT_STEP: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    #[default]
    Linear,
}

/// What the observed standard retention times are compared against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum DifferenceMode {
    /// The library retention time of each standard.
    #[default]
    LibraryRt,
    /// Retention times averaged over all samples, one per library entry.
    SampleAverage { average_rts: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RtCorrectionParams {
    pub interpolation: InterpolationMethod,
    pub leading: LeadingExtrapolation,
    pub trailing: TrailingExtrapolation,
    pub difference_mode: DifferenceMode,
    /// Smooths the per-scan difference with a moving average before correcting.
    pub smooth_difference: bool,
    pub smoothing_level: usize,
}

impl Default for RtCorrectionParams {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::Linear,
            leading: LeadingExtrapolation::HoldFirstPoint,
            trailing: TrailingExtrapolation::HoldLastPoint,
            difference_mode: DifferenceMode::LibraryRt,
            smooth_difference: false,
            smoothing_level: RT_DIFFERENCE_SMOOTHING_LEVEL,
        }
    }
}
