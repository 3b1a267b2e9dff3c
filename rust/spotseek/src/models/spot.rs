use serde::{
    Deserialize,
    Serialize,
};

/// Weight numbers at or above this value mark ions beyond the confirmed envelope.
///
/// They are kept for auditing and excluded from quantitation.
pub const BEYOND_ENVELOPE_OFFSET: u32 = 1000;

/// Which separation axis the `time` fields of a spot refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeparationAxis {
    #[default]
    RetentionTime,
    DriftTime,
}

/// Time, intensity and MS1 scan index at one characteristic point of a peak.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgePoint {
    pub time: f64,
    pub intensity: f64,
    pub scan: usize,
}

/// Position of a spot inside an isotope envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsotopeTag {
    pub parent_id: usize,
    pub weight_number: u32,
}

impl IsotopeTag {
    pub fn root(id: usize) -> Self {
        Self {
            parent_id: id,
            weight_number: 0,
        }
    }

    pub fn member(parent_id: usize, weight_number: u32) -> Self {
        Self {
            parent_id,
            weight_number,
        }
    }

    pub fn beyond_envelope(parent_id: usize, weight_number: u32) -> Self {
        Self {
            parent_id,
            weight_number: BEYOND_ENVELOPE_OFFSET + weight_number,
        }
    }

    pub fn is_root(&self) -> bool {
        self.weight_number == 0
    }

    pub fn is_beyond_envelope(&self) -> bool {
        self.weight_number >= BEYOND_ENVELOPE_OFFSET
    }
}

/// A detected chromatographic feature.
///
/// Created once by the detector. Afterwards only `isotope` changes, and only
/// through the isotope annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSpot {
    pub id: usize,
    pub mass: f64,
    pub axis: SeparationAxis,
    pub left: EdgePoint,
    pub apex: EdgePoint,
    pub right: EdgePoint,
    pub area_above_zero: f64,
    pub area_above_baseline: f64,
    pub signal_to_noise: f64,
    /// Percentile of the apex intensity among all spots of the run (0..=1).
    pub amplitude_score: f64,
    pub ms2_scan: Option<usize>,
    pub isotope: Option<IsotopeTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drift_spots: Vec<PeakSpot>,
}

impl PeakSpot {
    pub fn width(&self) -> f64 {
        self.right.time - self.left.time
    }

    pub fn half_width(&self) -> f64 {
        self.width() * 0.5
    }

    pub fn weight_number(&self) -> Option<u32> {
        self.isotope.map(|t| t.weight_number)
    }
}
