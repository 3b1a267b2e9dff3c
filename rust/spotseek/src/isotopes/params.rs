use crate::utils::OptionallyRestricted;
use serde::{
    Deserialize,
    Serialize,
};

/// A candidate is labeled-dominant when its labeled intensity exceeds this
/// multiple of its non-labeled intensity.
pub const LABELED_DOMINANCE_RATIO: f64 = 4.0;

/// Intensity multiple a trimmed envelope member needs to replace the current
/// first (non-labeled channel) or last (labeled channel) member.
pub const PROMOTION_RATIO: f64 = 5.0;

/// Ladder positions without an assignment after which the pattern counts as finished.
pub const FINISHED_GAP: u32 = 3;

/// Missing positions are only counted past this position.
pub const SKIP_TRACKING_START: u32 = 10;

/// The walk stops after more than this many consecutive missing positions.
pub const MAX_CONSECUTIVE_SKIPS: u32 = 3;

/// A second-pass spot only seeds an envelope when its non-labeled intensity is
/// at least this multiple of its labeled intensity.
pub const ROOT_DOMINANCE_RATIO: f64 = 4.0;

/// Empirical thresholds of the ladder walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderThresholds {
    pub labeled_dominance_ratio: f64,
    pub promotion_ratio: f64,
    pub finished_gap: u32,
    pub skip_tracking_start: u32,
    pub max_consecutive_skips: u32,
    pub root_dominance_ratio: f64,
}

impl Default for LadderThresholds {
    fn default() -> Self {
        Self {
            labeled_dominance_ratio: LABELED_DOMINANCE_RATIO,
            promotion_ratio: PROMOTION_RATIO,
            finished_gap: FINISHED_GAP,
            skip_tracking_start: SKIP_TRACKING_START,
            max_consecutive_skips: MAX_CONSECUTIVE_SKIPS,
            root_dominance_ratio: ROOT_DOMINANCE_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsotopeTrackingParams {
    /// Mass tolerance (Da) at m/z 200; scales linearly with mass.
    pub mass_tolerance: f64,
    pub max_charge: u8,
    /// Maximum RT distance between a root and its isotopologues.
    pub rt_tolerance: OptionallyRestricted<f64>,
    pub thresholds: LadderThresholds,
}

impl Default for IsotopeTrackingParams {
    fn default() -> Self {
        Self {
            mass_tolerance: 0.01,
            max_charge: 4,
            rt_tolerance: OptionallyRestricted::Unrestricted,
            thresholds: LadderThresholds::default(),
        }
    }
}

impl IsotopeTrackingParams {
    /// Mass accuracy at `mass`.
    pub fn accuracy_at(&self, mass: f64) -> f64 {
        self.mass_tolerance * mass / 200.0
    }
}
