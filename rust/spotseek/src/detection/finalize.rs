use crate::models::PeakSpot;

/// Orders spots by apex RT then mass, numbers them and sets their amplitude scores.
///
/// The amplitude score of a spot is `(rank + 1) / n` of its apex intensity
/// among all `n` spots, so the most intense spot scores 1.
pub fn finalize_spots(mut spots: Vec<PeakSpot>) -> Vec<PeakSpot> {
    spots.sort_by(|a, b| {
        a.apex
            .time
            .total_cmp(&b.apex.time)
            .then(a.mass.total_cmp(&b.mass))
    });
    for (id, spot) in spots.iter_mut().enumerate() {
        spot.id = id;
    }

    let n = spots.len() as f64;
    let mut by_intensity: Vec<usize> = (0..spots.len()).collect();
    by_intensity.sort_by(|&a, &b| spots[a].apex.intensity.total_cmp(&spots[b].apex.intensity));
    for (rank, idx) in by_intensity.into_iter().enumerate() {
        spots[idx].amplitude_score = (rank + 1) as f64 / n;
    }
    spots
}
