//! Removal of peaks seen twice by neighbouring mass slices.
//!
//! Slices overlap by half their width, so one ion often yields a peak in two
//! consecutive slices. Slices are merged in order, each one only against the
//! peaks kept from the slice right before it.

use crate::models::PeakSpot;

/// Upper bound (minutes) of the apex RT difference between duplicate peaks.
pub const MAX_APEX_RT_DIFFERENCE: f64 = 0.03;

fn is_same_feature(a: &PeakSpot, b: &PeakSpot, slice_width: f64) -> bool {
    if (a.mass - b.mass).abs() > slice_width * 0.5 {
        return false;
    }
    let overlaps = a.left.time <= b.right.time && b.left.time <= a.right.time;
    if !overlaps {
        return false;
    }
    let apex_tolerance = ((a.half_width() + b.half_width()) * 0.5).min(MAX_APEX_RT_DIFFERENCE);
    (a.apex.time - b.apex.time).abs() < apex_tolerance
}

/// Drops duplicates between `previous` (kept peaks of the prior slice) and `current`.
///
/// Of each duplicate pair the less intense peak is removed from the list it
/// belongs to. Returns the number of removed peaks.
pub fn remove_redundant(previous: &mut Vec<PeakSpot>, current: &mut Vec<PeakSpot>, slice_width: f64) -> usize {
    let mut drop_previous = vec![false; previous.len()];
    let mut drop_current = vec![false; current.len()];

    for (ci, cur) in current.iter().enumerate() {
        for (pi, prev) in previous.iter().enumerate() {
            if drop_previous[pi] || !is_same_feature(prev, cur, slice_width) {
                continue;
            }
            if prev.apex.intensity >= cur.apex.intensity {
                drop_current[ci] = true;
                break;
            }
            drop_previous[pi] = true;
        }
    }

    let removed = drop_previous.iter().chain(drop_current.iter()).filter(|&&d| d).count();
    retain_flagged(previous, &drop_previous);
    retain_flagged(current, &drop_current);
    removed
}

fn retain_flagged(spots: &mut Vec<PeakSpot>, dropped: &[bool]) {
    let mut idx = 0;
    spots.retain(|_| {
        let keep = !dropped[idx];
        idx += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EdgePoint;

    fn spot(mass: f64, left: f64, apex: f64, right: f64, height: f64) -> PeakSpot {
        let edge = |time, intensity| EdgePoint {
            time,
            intensity,
            scan: 0,
        };
        PeakSpot {
            id: 0,
            mass,
            axis: Default::default(),
            left: edge(left, 0.0),
            apex: edge(apex, height),
            right: edge(right, 0.0),
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
    fn test_keeps_more_intense_duplicate() {
        let mut prev = vec![spot(200.05, 1.0, 1.1, 1.2, 500.0)];
        let mut cur = vec![spot(200.07, 1.0, 1.11, 1.2, 900.0)];
        let removed = remove_redundant(&mut prev, &mut cur, 0.1);
        assert_eq!(removed, 1);
        assert!(prev.is_empty());
        assert_eq!(cur.len(), 1);

        let mut prev = vec![spot(200.05, 1.0, 1.1, 1.2, 900.0)];
        let mut cur = vec![spot(200.07, 1.0, 1.11, 1.2, 500.0)];
        remove_redundant(&mut prev, &mut cur, 0.1);
        assert_eq!(prev.len(), 1);
        assert!(cur.is_empty());
    }

    #[test]
    fn test_distinct_features_survive() {
        // Too far in mass.
        let mut prev = vec![spot(200.00, 1.0, 1.1, 1.2, 500.0)];
        let mut cur = vec![spot(200.08, 1.0, 1.1, 1.2, 900.0)];
        assert_eq!(remove_redundant(&mut prev, &mut cur, 0.1), 0);

        // Apexes more than 0.03 min apart.
        let mut prev = vec![spot(200.05, 1.0, 1.1, 1.3, 500.0)];
        let mut cur = vec![spot(200.07, 1.0, 1.15, 1.3, 900.0)];
        assert_eq!(remove_redundant(&mut prev, &mut cur, 0.1), 0);

        // No RT overlap.
        let mut prev = vec![spot(200.05, 1.0, 1.1, 1.2, 500.0)];
        let mut cur = vec![spot(200.07, 1.3, 1.4, 1.5, 900.0)];
        assert_eq!(remove_redundant(&mut prev, &mut cur, 0.1), 0);
        assert_eq!(prev.len() + cur.len(), 2);
    }
}
