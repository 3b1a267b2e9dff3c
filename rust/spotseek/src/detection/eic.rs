//! Extraction of ion chromatograms from the MS1 scan stream.

use crate::models::{
    ChromPoint,
    RawScan,
};
use crate::utils::{
    TupleRange,
    binary_search_range_by_key,
};
use std::borrow::Cow;

/// The MS1 scans of a run, sorted by retention time.
///
/// For ion mobility data the stream holds one accumulated spectrum per
/// retention time (all drift scans of a frame merged), otherwise it borrows
/// the MS1 scans as they are.
#[derive(Debug)]
pub struct Ms1Stream<'a> {
    scans: Vec<Cow<'a, RawScan>>,
}

impl<'a> Ms1Stream<'a> {
    pub fn new(scans: &'a [RawScan]) -> Self {
        let mut ms1: Vec<Cow<'a, RawScan>> = scans
            .iter()
            .filter(|s| s.is_ms1())
            .map(Cow::Borrowed)
            .collect();
        ms1.sort_by(|a, b| a.rt.total_cmp(&b.rt));
        Self { scans: ms1 }
    }

    /// Merges all MS1 scans sharing a retention time into one spectrum.
    ///
    /// The accumulated scan keeps the index of the first scan of its frame.
    pub fn accumulated(scans: &'a [RawScan]) -> Self {
        let sorted = Self::new(scans);
        let mut out: Vec<Cow<'a, RawScan>> = Vec::new();
        for scan in sorted.scans.into_iter() {
            match out.last_mut() {
                Some(last) if last.rt == scan.rt => {
                    let merged = last.to_mut();
                    merged.spectrum.extend_from_slice(&scan.spectrum);
                    merged.drift_time = None;
                }
                _ => out.push(scan),
            }
        }
        for scan in out.iter_mut() {
            if let Cow::Owned(s) = scan {
                s.spectrum.sort_by(|a, b| a.mz.total_cmp(&b.mz));
            }
        }
        Self { scans: out }
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawScan> + '_ {
        self.scans.iter().map(|s| s.as_ref())
    }

    /// Lowest and highest m/z observed in any MS1 spectrum.
    pub fn mz_bounds(&self) -> Option<TupleRange<f64>> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (first, last) in self.iter().filter_map(|s| s.mz_bounds()) {
            lo = lo.min(first);
            hi = hi.max(last);
        }
        TupleRange::try_new(lo, hi).ok()
    }

    pub fn rt_bounds(&self) -> Option<TupleRange<f64>> {
        let first = self.scans.first()?.rt;
        let last = self.scans.last()?.rt;
        TupleRange::try_new(first, last).ok()
    }

    /// One sample per MS1 scan inside `rt_range`, summing the intensity inside `mz_range`.
    ///
    /// Scans without signal in the mass window contribute a zero sample, so the
    /// chromatogram stays contiguous in time. The representative m/z of a
    /// sample is the m/z of its most intense peak (the window center when empty).
    pub fn extract(&self, mz_range: TupleRange<f64>, rt_range: TupleRange<f64>) -> Vec<ChromPoint> {
        let scan_range = binary_search_range_by_key(&self.scans, rt_range, |s| s.rt);
        let center = (mz_range.start() + mz_range.end()) * 0.5;
        self.scans[scan_range]
            .iter()
            .map(|scan| {
                let (intensity, mz) = scan.summed_in(mz_range).unwrap_or((0.0, center));
                ChromPoint {
                    scan: scan.index,
                    time: scan.rt,
                    mz,
                    intensity,
                }
            })
            .collect()
    }
}

/// True when the chromatogram has no sample with positive intensity.
pub fn is_blank(points: &[ChromPoint]) -> bool {
    points.iter().all(|p| p.intensity <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpectrumPeak;

    fn scan(index: usize, rt: f64, ms_level: u8, drift: Option<f64>, peaks: &[(f64, f64)]) -> RawScan {
        RawScan {
            index,
            rt,
            ms_level,
            precursor: None,
            drift_time: drift,
            spectrum: peaks
                .iter()
                .map(|&(mz, intensity)| SpectrumPeak { mz, intensity })
                .collect(),
        }
    }

    #[test]
    fn test_extract_skips_ms2_and_fills_zeros() {
        let scans = vec![
            scan(0, 0.1, 1, None, &[(200.0, 10.0)]),
            scan(1, 0.15, 2, None, &[(200.0, 99.0)]),
            scan(2, 0.2, 1, None, &[(300.0, 10.0)]),
            scan(3, 0.3, 1, None, &[(199.995, 4.0), (200.002, 6.0)]),
        ];
        let stream = Ms1Stream::new(&scans);
        assert_eq!(stream.len(), 3);
        let eic = stream.extract(
            TupleRange::around(200.0, 0.01),
            TupleRange::try_new(0.0, 1.0).unwrap(),
        );
        let ints: Vec<f64> = eic.iter().map(|p| p.intensity).collect();
        assert_eq!(ints, vec![10.0, 0.0, 10.0]);
        assert_eq!(eic[2].mz, 200.002);
        assert_eq!(eic[2].scan, 3);
        assert_eq!(stream.mz_bounds().unwrap().as_tuple(), (199.995, 300.0));
    }

    #[test]
    fn test_extract_respects_rt_range() {
        let scans: Vec<RawScan> = (0..10)
            .map(|i| scan(i, i as f64 * 0.1, 1, None, &[(150.0, 1.0)]))
            .collect();
        let stream = Ms1Stream::new(&scans);
        let eic = stream.extract(
            TupleRange::around(150.0, 0.01),
            TupleRange::try_new(0.25, 0.55).unwrap(),
        );
        assert_eq!(eic.len(), 3);
        assert_eq!(eic[0].scan, 3);
    }

    #[test]
    fn test_accumulated_merges_frames() {
        let scans = vec![
            scan(0, 1.0, 1, Some(0.8), &[(200.0, 1.0)]),
            scan(1, 1.0, 1, Some(0.9), &[(150.0, 2.0), (200.0, 3.0)]),
            scan(2, 2.0, 1, Some(0.8), &[(200.0, 5.0)]),
        ];
        let stream = Ms1Stream::accumulated(&scans);
        assert_eq!(stream.len(), 2);
        let first = stream.iter().next().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.spectrum.len(), 3);
        assert_eq!(first.spectrum[0].mz, 150.0);
        let eic = stream.extract(
            TupleRange::around(200.0, 0.01),
            TupleRange::try_new(0.0, 5.0).unwrap(),
        );
        assert_eq!(eic[0].intensity, 4.0);
        assert_eq!(eic[1].intensity, 5.0);
    }
}
