use super::trackable::IsotopeTrackable;
use crate::utils::{
    TupleRange,
    binary_search_range_by_key,
};

/// Positions of a spot collection sorted by ascending mass.
#[derive(Debug, Clone)]
pub struct MassIndex {
    order: Vec<usize>,
    masses: Vec<f64>,
}

impl MassIndex {
    pub fn new<T: IsotopeTrackable>(spots: &[T]) -> Self {
        let mut order: Vec<usize> = (0..spots.len()).collect();
        order.sort_by(|&a, &b| {
            spots[a]
                .mass()
                .total_cmp(&spots[b].mass())
                .then(a.cmp(&b))
        });
        let masses = order.iter().map(|&i| spots[i].mass()).collect();
        Self { order, masses }
    }

    /// All positions, lightest first.
    pub fn ascending(&self) -> &[usize] {
        &self.order
    }

    /// Positions of the spots with a mass inside `range`, lightest first.
    pub fn within(&self, range: TupleRange<f64>) -> &[usize] {
        let found = binary_search_range_by_key(&self.masses, range, |&m| m);
        &self.order[found]
    }

    /// Positions of the spots with a mass within `tolerance` of `mass`.
    pub fn around(&self, mass: f64, tolerance: f64) -> &[usize] {
        self.within(TupleRange::around(mass, tolerance.abs()))
    }
}
