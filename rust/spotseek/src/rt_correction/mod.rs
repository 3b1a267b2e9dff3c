//! Retention time correction against internal standards.
//!
//! The standards are re-located with targeted detection, their RT differences
//! fitted with a [`DifferenceCurve`] and every scan time shifted by the curve.

pub mod params;
pub mod standards;

use crate::detection::DetectionParams;
use crate::errors::DataProcessingError;
use crate::models::RawScan;
use crate::utils::smoothing::moving_average_into;
pub use params::{
    DifferenceMode,
    InterpolationMethod,
    MIN_RT_STEP,
    RT_DIFFERENCE_SMOOTHING_LEVEL,
    RtCorrectionParams,
};
use rtwarp::{
    DifferenceCurve,
    Point,
};
use serde::{
    Deserialize,
    Serialize,
};
pub use standards::{
    StandardCompound,
    StandardPair,
    find_standards,
    load_library,
};
use tracing::{
    info,
    warn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionQuality {
    Fitted { n_standards: usize },
    /// No standard was found; the corrected times equal the original ones.
    Identity,
}

/// Per-scan outcome of a correction, in the order of the input scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtCorrectionResult {
    pub original_rt: Vec<f64>,
    pub rt_difference: Vec<f64>,
    pub predicted_rt: Vec<f64>,
    pub standards: Vec<StandardPair>,
    pub quality: CorrectionQuality,
}

/// Difference anchors `(observed RT, observed - reference RT)` of the detected standards.
fn anchors(pairs: &[StandardPair], mode: &DifferenceMode) -> Result<Vec<Point>, DataProcessingError> {
    let reference: Vec<f64> = match mode {
        DifferenceMode::LibraryRt => pairs.iter().map(|p| p.standard.rt).collect(),
        DifferenceMode::SampleAverage { average_rts } => {
            if average_rts.len() != pairs.len() {
                return Err(DataProcessingError::ExpectedSlicesSameLength {
                    expected: pairs.len(),
                    other: average_rts.len(),
                    context: "Averaged standard RTs vs. library entries".to_string(),
                });
            }
            average_rts.clone()
        }
    };
    Ok(pairs
        .iter()
        .zip(reference)
        .filter(|(p, _)| p.is_detected())
        .map(|(p, reference)| Point {
            x: p.observed_rt(),
            y: p.observed_rt() - reference,
        })
        .collect())
}

/// Subtracts `difference` from `original`, keeping the result strictly increasing.
pub fn apply_difference(original: &[f64], difference: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(original.len());
    for (rt, diff) in original.iter().zip(difference.iter()) {
        let mut corrected = rt - diff;
        if let Some(&previous) = out.last() {
            if corrected <= previous {
                corrected = previous + MIN_RT_STEP;
            }
        }
        out.push(corrected);
    }
    out
}

/// Fits the difference curve from already matched standards and corrects every scan.
pub fn correct_with_pairs(
    scans: &[RawScan],
    pairs: Vec<StandardPair>,
    params: &RtCorrectionParams,
) -> Result<RtCorrectionResult, DataProcessingError> {
    let original_rt: Vec<f64> = scans.iter().map(|s| s.rt).collect();
    let anchors = anchors(&pairs, &params.difference_mode)?;

    if anchors.is_empty() {
        warn!("No internal standard detected, retention times are left as they are");
        return Ok(RtCorrectionResult {
            rt_difference: vec![0.0; original_rt.len()],
            predicted_rt: original_rt.clone(),
            original_rt,
            standards: pairs,
            quality: CorrectionQuality::Identity,
        });
    }

    let run_end = original_rt.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let curve = match params.interpolation {
        InterpolationMethod::Linear => {
            DifferenceCurve::fit(&anchors, params.leading, params.trailing, run_end)
                .map_err(|e| DataProcessingError::from(e).append_to_context("Fitting RT differences"))?
        }
    };

    let mut rt_difference = curve.predict_many(&original_rt);
    if params.smooth_difference {
        let mut smoothed = Vec::with_capacity(rt_difference.len());
        moving_average_into(&rt_difference, params.smoothing_level, &mut smoothed);
        rt_difference = smoothed;
    }
    let predicted_rt = apply_difference(&original_rt, &rt_difference);

    info!(
        "Corrected {} scans using {} standards",
        original_rt.len(),
        anchors.len()
    );
    Ok(RtCorrectionResult {
        original_rt,
        rt_difference,
        predicted_rt,
        standards: pairs,
        quality: CorrectionQuality::Fitted {
            n_standards: anchors.len(),
        },
    })
}

/// Finds the standards of `library` in the run and corrects its retention times.
pub fn correct(
    scans: &[RawScan],
    library: &[StandardCompound],
    detection_params: &DetectionParams,
    params: &RtCorrectionParams,
) -> Result<RtCorrectionResult, DataProcessingError> {
    let pairs = find_standards(scans, library, detection_params);
    correct_with_pairs(scans, pairs, params)
}
