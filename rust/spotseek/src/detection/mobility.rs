//! Drift-time resolution of retention-time features (ion mobility runs).

use super::ms2::Ms2Index;
use super::noise::estimate_noise;
use super::params::DriftParams;
use super::peak_shape::PeakShapeDetector;
use crate::models::{
    ChromPoint,
    PeakSpot,
    RawScan,
    SeparationAxis,
    chromatogram,
};
use crate::utils::{
    Smoother,
    TupleRange,
    binary_search_range_by_key,
};

/// MS1 scans carrying a drift time, sorted by retention time.
#[derive(Debug)]
pub struct DriftIndex<'a> {
    scans: Vec<&'a RawScan>,
}

impl<'a> DriftIndex<'a> {
    pub fn new(scans: &'a [RawScan]) -> Self {
        let mut drift: Vec<&'a RawScan> = scans
            .iter()
            .filter(|s| s.is_ms1() && s.drift_time.is_some())
            .collect();
        drift.sort_by(|a, b| a.rt.total_cmp(&b.rt));
        Self { scans: drift }
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Intensity inside `mz_range` per distinct drift time, over the scans in `rt_range`.
    ///
    /// Samples are sorted by drift time; `scan` is the first scan seen at that
    /// drift time and `mz` the m/z of the most intense contribution.
    pub fn mobilogram(&self, mz_range: TupleRange<f64>, rt_range: TupleRange<f64>) -> Vec<ChromPoint> {
        let range = binary_search_range_by_key(&self.scans, rt_range, |s| s.rt);
        let center = (mz_range.start() + mz_range.end()) * 0.5;

        let mut samples: Vec<(ChromPoint, f64)> = self.scans[range]
            .iter()
            .filter_map(|scan| {
                let drift = scan.drift_time?;
                let (intensity, mz, base) = match scan.summed_in(mz_range) {
                    Some((total, mz)) => (total, mz, max_in(scan, mz_range)),
                    None => (0.0, center, 0.0),
                };
                let point = ChromPoint {
                    scan: scan.index,
                    time: drift,
                    mz,
                    intensity,
                };
                Some((point, base))
            })
            .collect();
        samples.sort_by(|a, b| a.0.time.total_cmp(&b.0.time));

        let mut out: Vec<ChromPoint> = Vec::with_capacity(samples.len());
        let mut best_base: f64 = 0.0;
        for (point, base) in samples {
            match out.last_mut() {
                Some(last) if last.time == point.time => {
                    last.intensity += point.intensity;
                    if base > best_base {
                        best_base = base;
                        last.mz = point.mz;
                    }
                }
                _ => {
                    best_base = base;
                    out.push(point);
                }
            }
        }
        out
    }
}

fn max_in(scan: &RawScan, mz_range: TupleRange<f64>) -> f64 {
    scan.peaks_in(mz_range)
        .iter()
        .map(|p| p.intensity)
        .fold(0.0, f64::max)
}

/// Everything the drift pass needs besides the feature itself.
pub struct DriftPass<'a, 'p, S: Smoother, P: PeakShapeDetector> {
    pub index: &'p DriftIndex<'a>,
    pub ms2: &'p Ms2Index<'a>,
    pub params: &'p DriftParams,
    pub smoother: &'p S,
    pub shape: &'p P,
    pub mass_tolerance: f64,
    pub min_datapoints: usize,
    pub min_amplitude: f64,
}

impl<S: Smoother, P: PeakShapeDetector> DriftPass<'_, '_, S, P> {
    /// Drift-axis sub spots of `feature`, with ids local to the feature.
    pub fn resolve(&self, feature: &PeakSpot) -> Vec<PeakSpot> {
        let lo = feature.left.time.max(feature.apex.time - self.params.rt_half_window);
        let hi = feature.right.time.min(feature.apex.time + self.params.rt_half_window);
        let Ok(rt_range) = TupleRange::try_new(lo, hi) else {
            return Vec::new();
        };
        let points = self.index.mobilogram(
            TupleRange::around(feature.mass, self.mass_tolerance),
            rt_range,
        );
        if points.len() < 3 {
            return Vec::new();
        }

        let times = chromatogram::times(&points);
        let smoothed = self.smoother.smooth(&chromatogram::intensities(&points));
        let candidates = self.shape.detect(
            &times,
            &smoothed,
            self.min_datapoints,
            self.min_amplitude * self.params.amplitude_factor,
        );
        let Some(max_apex) = candidates
            .iter()
            .map(|c| c.apex_intensity)
            .max_by(|a, b| a.total_cmp(b))
        else {
            return Vec::new();
        };

        let noise = estimate_noise(&smoothed);
        let feature_rt = TupleRange::try_new(feature.left.time, feature.right.time).ok();
        candidates
            .iter()
            .filter(|c| c.edge_drop() > max_apex * self.params.min_relative_drop)
            .enumerate()
            .map(|(local_id, c)| {
                let mut spot = c.to_spot(&points, &smoothed, noise, SeparationAxis::DriftTime);
                spot.id = local_id;
                spot.ms2_scan = feature_rt
                    .and_then(|rt| self.ms2.gated_isolation_match(feature.mass, rt, spot.apex.time));
                spot
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::peak_shape::LocalMaximaPeakShape;
    use crate::models::{
        EdgePoint,
        PrecursorWindow,
        SpectrumPeak,
    };
    use crate::utils::{
        Smoothing,
        SmoothingMethod,
    };

    fn drift_scan(index: usize, rt: f64, drift: f64, intensity: f64) -> RawScan {
        RawScan {
            index,
            rt,
            ms_level: 1,
            precursor: None,
            drift_time: Some(drift),
            spectrum: vec![SpectrumPeak {
                mz: 400.0,
                intensity,
            }],
        }
    }

    #[test]
    fn test_mobilogram_groups_by_drift() {
        let scans = vec![
            drift_scan(0, 1.0, 0.5, 10.0),
            drift_scan(1, 1.0, 0.6, 20.0),
            drift_scan(2, 1.1, 0.5, 5.0),
            drift_scan(3, 1.1, 0.6, 1.0),
            drift_scan(4, 9.0, 0.5, 1000.0),
        ];
        let index = DriftIndex::new(&scans);
        let mob = index.mobilogram(
            TupleRange::around(400.0, 0.01),
            TupleRange::try_new(0.9, 1.2).unwrap(),
        );
        assert_eq!(mob.len(), 2);
        assert_eq!((mob[0].time, mob[0].intensity), (0.5, 15.0));
        assert_eq!((mob[1].time, mob[1].intensity), (0.6, 21.0));
        assert_eq!(mob[0].scan, 0);
    }

    fn gated_ms2(index: usize, selected_mz: f64, gate: (f64, f64)) -> RawScan {
        RawScan {
            index,
            rt: 1.0,
            ms_level: 2,
            precursor: Some(PrecursorWindow {
                selected_mz,
                lower_offset: 0.5,
                upper_offset: 0.5,
                drift_gate: Some(TupleRange::try_new(gate.0, gate.1).unwrap()),
            }),
            drift_time: None,
            spectrum: vec![SpectrumPeak {
                mz: 150.0,
                intensity: 10.0,
            }],
        }
    }

    fn feature() -> PeakSpot {
        let edge = |time| EdgePoint {
            time,
            intensity: 0.0,
            scan: 0,
        };
        PeakSpot {
            id: 0,
            mass: 400.0,
            axis: SeparationAxis::RetentionTime,
            left: edge(0.9),
            apex: edge(1.0),
            right: edge(1.1),
            area_above_zero: 0.0,
            area_above_baseline: 0.0,
            signal_to_noise: 0.0,
            amplitude_score: 0.0,
            ms2_scan: None,
            isotope: None,
            drift_spots: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_keeps_relevant_drift_peaks() {
        // Three drift peaks; the middle one drops only 80, under 10% of the tallest apex.
        let trace = [
            0.0, 100.0, 500.0, 1000.0, 500.0, 100.0, 0.0, 40.0, 80.0, 40.0, 0.0, 100.0, 300.0, 600.0,
            300.0, 100.0, 0.0,
        ];
        let mut scans: Vec<RawScan> = trace
            .iter()
            .enumerate()
            .map(|(k, &intensity)| drift_scan(k, 1.0, 1.0 + k as f64 * 0.125, intensity))
            .collect();
        // Covers the first drift apex (1.375).
        scans.push(gated_ms2(100, 400.0, (1.3, 1.45)));
        // Covers the last drift apex (2.625) but isolates another mass.
        scans.push(gated_ms2(101, 420.0, (2.5, 2.75)));
        // Covers the mass but no drift apex.
        scans.push(gated_ms2(102, 400.0, (3.0, 3.25)));

        let index = DriftIndex::new(&scans);
        let ms2 = Ms2Index::new(&scans);
        let params = DriftParams::default();
        let smoother = Smoothing::new(SmoothingMethod::None, 0);
        let pass = DriftPass {
            index: &index,
            ms2: &ms2,
            params: &params,
            smoother: &smoother,
            shape: &LocalMaximaPeakShape,
            mass_tolerance: 0.01,
            min_datapoints: 3,
            min_amplitude: 100.0,
        };

        let spots = pass.resolve(&feature());
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].id, 0);
        assert_eq!(spots[1].id, 1);
        assert!(spots.iter().all(|s| s.axis == SeparationAxis::DriftTime));
        assert_eq!(spots[0].apex.time, 1.375);
        assert_eq!(spots[0].apex.intensity, 1000.0);
        assert_eq!(spots[1].apex.time, 2.625);
        assert_eq!(spots[0].ms2_scan, Some(100));
        assert_eq!(spots[1].ms2_scan, None);
    }
}
