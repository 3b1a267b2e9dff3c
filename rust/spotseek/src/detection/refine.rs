//! Precision pass: re-extracts each retained peak with a narrow mass window and
//! recomputes its geometry.

use super::eic::Ms1Stream;
use super::noise::estimate_noise;
use super::peak_shape::PeakCandidate;
use crate::models::{
    ChromPoint,
    PeakSpot,
    SeparationAxis,
    chromatogram,
};
use crate::utils::{
    Smoother,
    TupleRange,
    nearest_index_by_key,
};

/// The re-extraction widens the RT window by this many peak widths on each side.
pub const REFINE_RT_MARGIN_FACTOR: f64 = 1.0;

/// Refined chromatograms shorter than this are rejected.
pub const MIN_REFINE_POINTS: usize = 6;

/// Samples searched on each side of the old apex for a sharper local maximum.
pub const APEX_SEARCH_RADIUS: usize = 2;

/// Settings of one refinement.
#[derive(Debug, Clone, Copy)]
pub struct RefineSettings<'s, S: Smoother> {
    pub mass_tolerance: f64,
    pub min_amplitude: f64,
    pub smoother: &'s S,
}

/// Re-extracts `spot` from `stream` and rebuilds it on the narrow chromatogram.
///
/// Returns `None` when the refined peak is no longer a valid peak.
pub fn refine_spot<S: Smoother>(
    stream: &Ms1Stream,
    spot: &PeakSpot,
    settings: &RefineSettings<'_, S>,
) -> Option<PeakSpot> {
    let margin = spot.width() * REFINE_RT_MARGIN_FACTOR;
    let rt_range = TupleRange::try_new(spot.left.time - margin, spot.right.time + margin).ok()?;
    let points = stream.extract(
        TupleRange::around(spot.mass, settings.mass_tolerance),
        rt_range,
    );
    refine_on_points(&points, spot, settings)
}

pub(crate) fn refine_on_points<S: Smoother>(
    points: &[ChromPoint],
    spot: &PeakSpot,
    settings: &RefineSettings<'_, S>,
) -> Option<PeakSpot> {
    if points.len() < MIN_REFINE_POINTS {
        return None;
    }
    let smoothed = settings.smoother.smooth(&chromatogram::intensities(points));
    let nearest = nearest_index_by_key(points, spot.apex.time, |p| p.time)?;
    let apex = sharpest_apex(&smoothed, nearest);

    let left = expand_edge(points, &smoothed, apex, spot.apex.time - spot.left.time, Side::Left)
        .or_else(|| nearest_index_by_key(points, spot.left.time, |p| p.time))?;
    let right = expand_edge(points, &smoothed, apex, spot.right.time - spot.apex.time, Side::Right)
        .or_else(|| nearest_index_by_key(points, spot.right.time, |p| p.time))?;

    if left >= apex || right <= apex {
        return None;
    }
    let candidate = PeakCandidate {
        left,
        apex,
        right,
        left_intensity: smoothed[left],
        apex_intensity: smoothed[apex],
        right_intensity: smoothed[right],
        area: 0.0,
    };
    if candidate.left_intensity >= candidate.apex_intensity
        || candidate.right_intensity >= candidate.apex_intensity
    {
        return None;
    }
    let lowest_edge = candidate.left_intensity.min(candidate.right_intensity);
    if candidate.apex_intensity - lowest_edge < settings.min_amplitude {
        return None;
    }

    let noise = estimate_noise(&smoothed);
    Some(candidate.to_spot(points, &smoothed, noise, SeparationAxis::RetentionTime))
}

/// Highest strict local maximum within [`APEX_SEARCH_RADIUS`] of `nearest`, else `nearest`.
fn sharpest_apex(smoothed: &[f64], nearest: usize) -> usize {
    let n = smoothed.len();
    let lo = nearest.saturating_sub(APEX_SEARCH_RADIUS).max(1);
    let hi = (nearest + APEX_SEARCH_RADIUS).min(n.saturating_sub(2));
    (lo..=hi)
        .filter(|&i| smoothed[i] > smoothed[i - 1] && smoothed[i] > smoothed[i + 1])
        .max_by(|&a, &b| smoothed[a].total_cmp(&smoothed[b]))
        .unwrap_or(nearest)
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Walks away from `apex` while the trace does not rise and the edge stays
/// within `max_extent` of the apex time. `None` when no step was possible.
fn expand_edge(
    points: &[ChromPoint],
    smoothed: &[f64],
    apex: usize,
    max_extent: f64,
    side: Side,
) -> Option<usize> {
    let apex_time = points[apex].time;
    let mut idx = apex;
    loop {
        let next = match side {
            Side::Left if idx > 0 => idx - 1,
            Side::Right if idx + 1 < points.len() => idx + 1,
            _ => break,
        };
        if smoothed[next] > smoothed[idx] || (points[next].time - apex_time).abs() > max_extent {
            break;
        }
        idx = next;
    }
    (idx != apex).then_some(idx)
}
