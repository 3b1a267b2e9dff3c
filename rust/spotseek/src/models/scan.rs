use crate::utils::{
    TupleRange,
    binary_search_range_by_key,
};
use serde::{
    Deserialize,
    Serialize,
};

/// How MS2 scans were triggered during the acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AcquisitionMode {
    /// One MS1 survey stream with MS2 triggered on selected precursors.
    #[default]
    DataDependent,
    /// MS2 multiplexed across fixed precursor windows ("experiments").
    DataIndependent,
    /// Accumulated MS1 for the RT/m/z sweep plus a full resolution drift-time pass.
    IonMobility,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPeak {
    pub mz: f64,
    pub intensity: f64,
}

/// Precursor selection of an MS2 scan.
///
/// The isolation window spans `[selected_mz - lower_offset, selected_mz + upper_offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecursorWindow {
    pub selected_mz: f64,
    pub lower_offset: f64,
    pub upper_offset: f64,
    #[serde(default)]
    pub drift_gate: Option<TupleRange<f64>>,
}

impl PrecursorWindow {
    pub fn isolation_contains(&self, mz: f64) -> bool {
        self.selected_mz - self.lower_offset <= mz && mz <= self.selected_mz + self.upper_offset
    }

    /// A window without a drift gate accepts every drift time.
    pub fn drift_gate_contains(&self, drift_time: f64) -> bool {
        match self.drift_gate {
            Some(gate) => gate.contains(drift_time),
            None => true,
        }
    }
}

/// A decoded scan. Immutable once handed to the engine.
///
/// Times are in minutes. The spectrum has to be sorted by m/z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScan {
    pub index: usize,
    pub rt: f64,
    pub ms_level: u8,
    #[serde(default)]
    pub precursor: Option<PrecursorWindow>,
    #[serde(default)]
    pub drift_time: Option<f64>,
    pub spectrum: Vec<SpectrumPeak>,
}

impl RawScan {
    pub fn is_ms1(&self) -> bool {
        self.ms_level == 1
    }

    pub fn peaks_in(&self, mz_range: TupleRange<f64>) -> &[SpectrumPeak] {
        let range = binary_search_range_by_key(&self.spectrum, mz_range, |p| p.mz);
        &self.spectrum[range]
    }

    /// Summed intensity in the range and the m/z of its most intense peak.
    pub fn summed_in(&self, mz_range: TupleRange<f64>) -> Option<(f64, f64)> {
        let peaks = self.peaks_in(mz_range);
        let base = peaks
            .iter()
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))?;
        let total = peaks.iter().map(|p| p.intensity).sum::<f64>();
        Some((total, base.mz))
    }

    pub fn base_peak_intensity(&self) -> f64 {
        self.spectrum
            .iter()
            .map(|p| p.intensity)
            .fold(0.0, f64::max)
    }

    pub fn mz_bounds(&self) -> Option<(f64, f64)> {
        match (self.spectrum.first(), self.spectrum.last()) {
            (Some(first), Some(last)) => Some((first.mz, last.mz)),
            _ => None,
        }
    }
}
