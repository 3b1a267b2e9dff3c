use crate::detection::{
    DetectionParams,
    SpotDetector,
};
use crate::errors::{
    Result,
    SpotSeekError,
};
use crate::models::{
    AcquisitionMode,
    ChromPoint,
    PeakSpot,
    RawScan,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::Path;
use tracing::{
    info,
    warn,
};

fn included_by_default() -> bool {
    true
}

/// Internal standard library entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardCompound {
    pub name: String,
    pub mass: f64,
    pub rt: f64,
    pub mass_tolerance: f64,
    pub rt_tolerance: f64,
    #[serde(default)]
    pub min_peak_height: f64,
    #[serde(default = "included_by_default")]
    pub included: bool,
}

impl StandardCompound {
    /// True when `spot` could be this standard.
    pub fn accepts(&self, spot: &PeakSpot) -> bool {
        (spot.apex.time - self.rt).abs() <= self.rt_tolerance
            && spot.apex.intensity >= self.min_peak_height
    }
}

/// A library entry and the spot found for it.
///
/// Undetected (or not included) standards keep `matched = None` and act as
/// placeholders with an observed RT of 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardPair {
    pub standard: StandardCompound,
    pub matched: Option<PeakSpot>,
    pub chromatogram: Vec<ChromPoint>,
}

impl StandardPair {
    pub fn placeholder(standard: StandardCompound) -> Self {
        Self {
            standard,
            matched: None,
            chromatogram: Vec::new(),
        }
    }

    pub fn observed_rt(&self) -> f64 {
        self.matched.as_ref().map_or(0.0, |s| s.apex.time)
    }

    pub fn is_detected(&self) -> bool {
        self.matched.is_some()
    }
}

/// Looks up every library entry in the run, one targeted detection per entry.
///
/// Returns one pair per library entry, in library order. Among the spots
/// accepted by a standard the most intense one wins.
pub fn find_standards(
    scans: &[RawScan],
    library: &[StandardCompound],
    params: &DetectionParams,
) -> Vec<StandardPair> {
    let detector = SpotDetector::new(scans, AcquisitionMode::DataDependent, params.clone());
    let pairs: Vec<StandardPair> = library
        .par_iter()
        .map(|standard| {
            if !standard.included {
                return StandardPair::placeholder(standard.clone());
            }
            let (spots, chromatogram) = detector.detect_target(standard.mass, standard.mass_tolerance);
            let matched = spots
                .into_iter()
                .filter(|s| standard.accepts(s))
                .max_by(|a, b| a.apex.intensity.total_cmp(&b.apex.intensity));
            if matched.is_none() {
                warn!(
                    "Standard {} (m/z {}, RT {}) was not found",
                    standard.name, standard.mass, standard.rt
                );
            }
            StandardPair {
                standard: standard.clone(),
                matched,
                chromatogram,
            }
        })
        .collect();

    let found = pairs.iter().filter(|p| p.is_detected()).count();
    info!("Found {} of {} internal standards", found, library.len());
    pairs
}

/// Reads a JSON array of [`StandardCompound`]s.
pub fn load_library(path: impl AsRef<Path>) -> Result<Vec<StandardCompound>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| SpotSeekError::Io {
        source,
        path: Some(path.to_path_buf()),
    })?;
    let library: Vec<StandardCompound> = serde_json::from_str(&contents)?;
    Ok(library)
}
