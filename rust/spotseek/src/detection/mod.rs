//! Untargeted feature detection over the mass/retention-time plane.
//!
//! The MS1 m/z range is cut into overlapping mass slices. Each slice yields an
//! extracted ion chromatogram on which peaks are picked, filtered, merged with
//! the neighbouring slice and finally refined on a narrow mass window.
//!
//! ```text
//! slices (parallel) -> redundancy merge (serial) -> refine + MS2 link (parallel)
//!                   -> drift pass (ion mobility only) -> finalize
//! ```

pub mod eic;
pub mod finalize;
pub mod mobility;
pub mod ms2;
pub mod noise;
pub mod params;
pub mod peak_shape;
pub mod progress;
pub mod redundancy;
pub mod refine;

use crate::models::{
    AcquisitionMode,
    ChromPoint,
    PeakSpot,
    RawScan,
    SeparationAxis,
    chromatogram,
};
use crate::utils::{
    Smoother,
    TupleRange,
};
pub use eic::Ms1Stream;
use finalize::finalize_spots;
use mobility::{
    DriftIndex,
    DriftPass,
};
pub use ms2::Ms2Index;
use noise::{
    estimate_noise,
    is_baseline_noise,
};
pub use params::{
    DetectionParams,
    DriftParams,
    ExclusionMass,
};
pub use peak_shape::{
    LocalMaximaPeakShape,
    PeakCandidate,
    PeakShapeDetector,
};
use progress::ProgressCounter;
pub use progress::ProgressSink;
use rayon::prelude::*;
use redundancy::remove_redundant;
use refine::{
    RefineSettings,
    refine_spot,
};
use std::time::{
    Duration,
    Instant,
};
use tracing::{
    debug,
    info,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct DetectionTimings {
    pub sweep: Duration,
    pub merge: Duration,
    pub refine: Duration,
    pub drift: Duration,
}

/// Feature detector over one run.
///
/// Borrows the scans for its whole lifetime; nothing is cached between calls.
pub struct SpotDetector<'a, P: PeakShapeDetector = LocalMaximaPeakShape> {
    ms1: Ms1Stream<'a>,
    ms2: Ms2Index<'a>,
    drift: Option<DriftIndex<'a>>,
    mode: AcquisitionMode,
    params: DetectionParams,
    shape: P,
}

impl<'a> SpotDetector<'a> {
    pub fn new(scans: &'a [RawScan], mode: AcquisitionMode, params: DetectionParams) -> Self {
        Self::with_peak_shape(scans, mode, params, LocalMaximaPeakShape)
    }
}

impl<'a, P: PeakShapeDetector> SpotDetector<'a, P> {
    pub fn with_peak_shape(
        scans: &'a [RawScan],
        mode: AcquisitionMode,
        params: DetectionParams,
        shape: P,
    ) -> Self {
        let (ms1, drift) = match mode {
            AcquisitionMode::IonMobility => {
                (Ms1Stream::accumulated(scans), Some(DriftIndex::new(scans)))
            }
            _ => (Ms1Stream::new(scans), None),
        };
        Self {
            ms1,
            ms2: Ms2Index::new(scans),
            drift,
            mode,
            params,
            shape,
        }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Centers of the mass slices covering the observed and configured m/z range.
    pub fn slice_centers(&self) -> Vec<f64> {
        let width = self.params.mass_slice_width;
        let Some(range) = self
            .ms1
            .mz_bounds()
            .and_then(|observed| observed.try_intercept(self.params.mass_range))
        else {
            return Vec::new();
        };
        if width <= 0.0 {
            return Vec::new();
        }
        let count = ((range.end() - range.start()) / width).floor() as usize + 1;
        (0..count)
            .map(|i| range.start() + i as f64 * width)
            .collect()
    }

    fn sweep_rt_range(&self) -> Option<TupleRange<f64>> {
        self.ms1.rt_bounds()?.try_intercept(self.params.rt_range)
    }

    /// Peaks of one chromatogram that survive the boundary, exclusion and noise filters.
    fn pick_peaks(&self, points: &[ChromPoint]) -> Vec<PeakSpot> {
        if points.len() < 3 || eic::is_blank(points) {
            return Vec::new();
        }
        let times = chromatogram::times(points);
        let smoothed = self.params.smoothing.smooth(&chromatogram::intensities(points));
        let candidates = self.shape.detect(
            &times,
            &smoothed,
            self.params.min_datapoints,
            self.params.min_amplitude,
        );
        if candidates.iter().all(|c| c.apex_intensity <= 0.0) {
            return Vec::new();
        }

        let last = points.len() - 1;
        let noise = estimate_noise(&smoothed);
        candidates
            .iter()
            .filter(|c| c.left != 0 && c.right != last)
            .filter(|c| !(self.params.background_subtraction && is_baseline_noise(&smoothed, c)))
            .map(|c| c.to_spot(points, &smoothed, noise, SeparationAxis::RetentionTime))
            .filter(|spot| !self.params.is_excluded(spot.mass))
            .collect()
    }

    fn pick_slice(&self, center: f64, rt_range: TupleRange<f64>) -> Vec<PeakSpot> {
        let points = self.ms1.extract(
            TupleRange::around(center, self.params.mass_slice_width),
            rt_range,
        );
        self.pick_peaks(&points)
    }

    fn refine(&self, spot: &PeakSpot, mass_tolerance: f64) -> Option<PeakSpot> {
        let settings = RefineSettings {
            mass_tolerance,
            min_amplitude: self.params.min_amplitude,
            smoother: &self.params.smoothing,
        };
        let mut refined = refine_spot(&self.ms1, spot, &settings)?;
        refined.ms2_scan = self
            .ms2
            .link(&refined, self.mode, self.params.ms2_precursor_tolerance);
        Some(refined)
    }

    fn resolve_drift(&self, spots: &mut [PeakSpot]) {
        let Some(index) = self.drift.as_ref().filter(|d| !d.is_empty()) else {
            return;
        };
        let pass = DriftPass {
            index,
            ms2: &self.ms2,
            params: &self.params.drift,
            smoother: &self.params.smoothing,
            shape: &self.shape,
            mass_tolerance: self.params.centroid_ms1_tolerance,
            min_datapoints: self.params.min_datapoints,
            min_amplitude: self.params.min_amplitude,
        };
        spots.par_iter_mut().for_each(|spot| {
            let drift_spots = pass.resolve(spot);
            spot.drift_spots = drift_spots;
        });
    }

    /// Runs the full untargeted sweep.
    ///
    /// `progress` receives the percentage of finished mass slices.
    pub fn detect(&self, progress: Option<&dyn ProgressSink>) -> Vec<PeakSpot> {
        let mut timings = DetectionTimings::default();
        let centers = self.slice_centers();
        let counter = ProgressCounter::new(progress, centers.len());
        let Some(rt_range) = self.sweep_rt_range() else {
            counter.finish();
            return Vec::new();
        };
        info!(
            "Sweeping {} mass slices of width {} over RT {:?}",
            centers.len(),
            self.params.mass_slice_width,
            rt_range.as_tuple()
        );

        let st = Instant::now();
        let per_slice: Vec<Vec<PeakSpot>> = centers
            .par_iter()
            .map(|&center| {
                let out = self.pick_slice(center, rt_range);
                counter.tick();
                out
            })
            .collect();
        timings.sweep = st.elapsed();

        let st = Instant::now();
        let mut merged: Vec<PeakSpot> = Vec::new();
        let mut previous: Vec<PeakSpot> = Vec::new();
        let mut num_redundant = 0;
        for mut current in per_slice {
            num_redundant += remove_redundant(&mut previous, &mut current, self.params.mass_slice_width);
            merged.append(&mut previous);
            previous = current;
        }
        merged.append(&mut previous);
        timings.merge = st.elapsed();
        debug!(
            "Kept {} peaks after removing {} redundant ones",
            merged.len(),
            num_redundant
        );

        let st = Instant::now();
        let tolerance = self.params.centroid_ms1_tolerance;
        let mut refined: Vec<PeakSpot> = merged
            .par_iter()
            .filter_map(|spot| self.refine(spot, tolerance))
            .collect();
        timings.refine = st.elapsed();

        if self.mode == AcquisitionMode::IonMobility {
            let st = Instant::now();
            self.resolve_drift(&mut refined);
            timings.drift = st.elapsed();
        }

        let out = finalize_spots(refined);
        counter.finish();
        info!("Detected {} spots", out.len());
        info!("{:?}", timings);
        out
    }

    /// Detects peaks at one fixed mass over the full retention time range.
    ///
    /// Returns the refined spots and the chromatogram they were picked from.
    pub fn detect_target(&self, mass: f64, tolerance: f64) -> (Vec<PeakSpot>, Vec<ChromPoint>) {
        let Some(rt_range) = self.ms1.rt_bounds() else {
            return (Vec::new(), Vec::new());
        };
        let points = self.ms1.extract(TupleRange::around(mass, tolerance), rt_range);
        let spots: Vec<PeakSpot> = self
            .pick_peaks(&points)
            .iter()
            .filter_map(|spot| self.refine(spot, tolerance))
            .collect();
        (finalize_spots(spots), points)
    }
}

/// Untargeted detection with the default peak shape.
pub fn detect(
    scans: &[RawScan],
    mode: AcquisitionMode,
    params: &DetectionParams,
    progress: Option<&dyn ProgressSink>,
) -> Vec<PeakSpot> {
    SpotDetector::new(scans, mode, params.clone()).detect(progress)
}

/// Targeted detection of `mass` with the default peak shape.
pub fn detect_target(
    scans: &[RawScan],
    mass: f64,
    tolerance: f64,
    params: &DetectionParams,
) -> (Vec<PeakSpot>, Vec<ChromPoint>) {
    SpotDetector::new(scans, AcquisitionMode::DataDependent, params.clone()).detect_target(mass, tolerance)
}
