use super::spot::IsotopeTag;
use serde::{
    Deserialize,
    Serialize,
};

/// Detection status of a consensus feature in one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignedPeak {
    pub sample: usize,
    pub detected: bool,
    pub intensity: f64,
}

/// Read-only identification context of an aligned feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub library_id: u32,
    #[serde(default)]
    pub formula: Option<String>,
    pub name: String,
}

/// One consensus feature of a cross-sample alignment.
///
/// `peaks` holds one entry per sample, indexed by sample position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSpot {
    pub id: usize,
    pub mass: f64,
    pub rt: f64,
    pub representative_sample: usize,
    #[serde(default)]
    pub excluded: bool,
    pub peaks: Vec<AlignedPeak>,
    #[serde(default)]
    pub identification: Option<Identification>,
    #[serde(default)]
    pub isotope: Option<IsotopeTag>,
}

impl AlignmentSpot {
    pub fn representative_detected(&self) -> bool {
        self.peaks
            .get(self.representative_sample)
            .is_some_and(|p| p.detected)
    }
}
