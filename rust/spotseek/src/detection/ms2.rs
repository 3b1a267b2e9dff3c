//! Linking of detected spots to the MS2 scans that fragmented them.

use crate::models::{
    AcquisitionMode,
    PeakSpot,
    RawScan,
};
use crate::utils::{
    TupleRange,
    binary_search_range_by_key,
};

/// The MS2 scans of a run sorted by retention time.
#[derive(Debug)]
pub struct Ms2Index<'a> {
    scans: Vec<&'a RawScan>,
}

impl<'a> Ms2Index<'a> {
    pub fn new(scans: &'a [RawScan]) -> Self {
        let mut ms2: Vec<&'a RawScan> = scans
            .iter()
            .filter(|s| s.ms_level >= 2 && s.precursor.is_some())
            .collect();
        ms2.sort_by(|a, b| a.rt.total_cmp(&b.rt));
        Self { scans: ms2 }
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    fn in_rt(&self, rt_range: TupleRange<f64>) -> &[&'a RawScan] {
        let range = binary_search_range_by_key(&self.scans, rt_range, |s| s.rt);
        &self.scans[range]
    }

    /// Most intense (by base peak) MS2 scan inside `rt_range` whose selected
    /// precursor is within `tolerance` of `mass`.
    pub fn most_intense_precursor_match(
        &self,
        mass: f64,
        tolerance: f64,
        rt_range: TupleRange<f64>,
    ) -> Option<usize> {
        self.in_rt(rt_range)
            .iter()
            .filter(|scan| scan.precursor.is_some_and(|p| (p.selected_mz - mass).abs() <= tolerance))
            .max_by(|a, b| a.base_peak_intensity().total_cmp(&b.base_peak_intensity()))
            .map(|scan| scan.index)
    }

    /// Most intense MS2 scan inside `rt_range` whose precursor window covers
    /// both `mass` and `drift_time`.
    pub fn gated_isolation_match(
        &self,
        mass: f64,
        rt_range: TupleRange<f64>,
        drift_time: f64,
    ) -> Option<usize> {
        self.in_rt(rt_range)
            .iter()
            .filter(|scan| {
                scan.precursor
                    .is_some_and(|p| p.isolation_contains(mass) && p.drift_gate_contains(drift_time))
            })
            .max_by(|a, b| a.base_peak_intensity().total_cmp(&b.base_peak_intensity()))
            .map(|scan| scan.index)
    }

    /// MS2 scan nearest to `apex_rt` whose isolation window covers `mass`.
    pub fn nearest_isolation_match(&self, mass: f64, apex_rt: f64) -> Option<usize> {
        self.scans
            .iter()
            .filter(|scan| scan.precursor.is_some_and(|p| p.isolation_contains(mass)))
            .min_by(|a, b| (a.rt - apex_rt).abs().total_cmp(&(b.rt - apex_rt).abs()))
            .map(|scan| scan.index)
    }

    /// The MS2 scan representing `spot` under `mode`.
    pub fn link(&self, spot: &PeakSpot, mode: AcquisitionMode, tolerance: f64) -> Option<usize> {
        match mode {
            AcquisitionMode::DataIndependent => self.nearest_isolation_match(spot.mass, spot.apex.time),
            AcquisitionMode::DataDependent | AcquisitionMode::IonMobility => {
                let rt_range = TupleRange::try_new(spot.left.time, spot.right.time).ok()?;
                self.most_intense_precursor_match(spot.mass, tolerance, rt_range)
            }
        }
    }
}
