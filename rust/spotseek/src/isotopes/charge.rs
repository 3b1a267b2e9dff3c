//! Charge state estimation from the first isotopologue above a root.

use super::mass_index::MassIndex;
use crate::utils::TupleRange;

/// Smallest charge state.
pub const DEFAULT_CHARGE: u8 = 1;

/// Charges at or above this value need a second isotopologue to be trusted.
pub const HIGH_CHARGE_CONFIRMATION: u8 = 4;

/// Inputs of one charge estimate.
#[derive(Debug, Clone, Copy)]
pub struct ChargeQuery {
    pub root_mass: f64,
    pub mass_difference: f64,
    pub accuracy: f64,
    pub max_charge: u8,
}

impl ChargeQuery {
    fn matches(&self, mass: f64, position: f64, charge: u8) -> Option<f64> {
        let expected = self.root_mass + position * self.mass_difference / charge as f64;
        let diff = (mass - expected).abs();
        (diff <= self.accuracy).then_some(diff)
    }

    /// Charge (lowest on ties) whose first isotopologue is closest to `mass`.
    fn best_charge(&self, mass: f64) -> Option<u8> {
        let mut best: Option<(u8, f64)> = None;
        for charge in 1..=self.max_charge {
            if let Some(diff) = self.matches(mass, 1.0, charge) {
                if best.is_none_or(|(_, d)| diff < d) {
                    best = Some((charge, diff));
                }
            }
        }
        best.map(|(charge, _)| charge)
    }
}

/// Estimates the charge of the envelope rooted at `query.root_mass`.
///
/// Walks the candidates above the root in ascending mass; the first one
/// matching the first isotopologue of any charge decides. `is_candidate`
/// filters the positions of `index` that may take part.
pub fn estimate_charge(
    index: &MassIndex,
    masses: impl Fn(usize) -> f64,
    is_candidate: impl Fn(usize) -> bool,
    query: &ChargeQuery,
) -> u8 {
    if query.max_charge <= 1 {
        return DEFAULT_CHARGE;
    }
    let Ok(range) = TupleRange::try_new(
        query.root_mass,
        query.root_mass + query.mass_difference + query.accuracy,
    ) else {
        return DEFAULT_CHARGE;
    };

    let mut found: Option<(u8, f64)> = None;
    for &pos in index.within(range) {
        let mass = masses(pos);
        if mass <= query.root_mass || !is_candidate(pos) {
            continue;
        }
        if let Some(charge) = query.best_charge(mass) {
            found = Some((charge, mass));
            break;
        }
    }
    let Some((charge, mass)) = found else {
        return DEFAULT_CHARGE;
    };
    if charge < HIGH_CHARGE_CONFIRMATION {
        return charge;
    }

    // Neighbouring high charges are hard to tell apart from one isotopologue.
    let lower = charge - 1;
    if query.matches(mass, 1.0, lower).is_none() {
        return charge;
    }
    let second = query.root_mass + 2.0 * query.mass_difference / charge as f64;
    let confirmed = index
        .around(second, query.accuracy)
        .iter()
        .any(|&pos| is_candidate(pos));
    if confirmed {
        charge
    } else {
        lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isotopes::trackable::{
        ChannelSignal,
        IsotopeTrackable,
    };
    use crate::models::IsotopeTag;

    struct M(f64);

    impl IsotopeTrackable for M {
        fn spot_id(&self) -> usize {
            0
        }
        fn mass(&self) -> f64 {
            self.0
        }
        fn rt(&self) -> f64 {
            0.0
        }
        fn set_isotope(&mut self, _tag: IsotopeTag) {}
        fn channel(&self, _idx: usize) -> Option<ChannelSignal> {
            None
        }
    }

    fn charge_of(masses: &[f64], accuracy: f64) -> u8 {
        let spots: Vec<M> = masses.iter().map(|&m| M(m)).collect();
        let index = MassIndex::new(&spots);
        let query = ChargeQuery {
            root_mass: masses[0],
            mass_difference: 1.0,
            accuracy,
            max_charge: 6,
        };
        estimate_charge(&index, |i| spots[i].0, |i| i != 0, &query)
    }

    #[test]
    fn test_single_and_double_charge() {
        assert_eq!(charge_of(&[500.0, 501.0], 0.01), 1);
        assert_eq!(charge_of(&[500.0, 500.5, 501.0], 0.01), 2);
        assert_eq!(charge_of(&[500.0], 0.01), 1);
        assert_eq!(charge_of(&[500.0, 500.7], 0.01), 1);
    }

    #[test]
    fn test_tie_goes_to_lower_charge() {
        // 500.75 is exactly between the z = 1 (501.0) and z = 2 (500.5) positions.
        assert_eq!(charge_of(&[500.0, 500.75], 0.25), 1);
    }

    #[test]
    fn test_high_charge_needs_confirmation() {
        // z = 5 fits 500.2 best but z = 4 (500.25) is within a loose tolerance.
        assert_eq!(charge_of(&[500.0, 500.2], 0.06), 4);
        assert_eq!(charge_of(&[500.0, 500.2, 500.4], 0.06), 5);
    }
}
