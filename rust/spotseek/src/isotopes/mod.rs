//! Grouping of spots into isotope envelopes.
//!
//! Works on any collection implementing [`IsotopeTrackable`]. Spots are kept
//! in place (the slice is the arena, tags refer to spot ids) and only their
//! isotope tag is written.
//!
//! Two passes run over the spots in ascending mass:
//! 1. identified spots seed envelopes, walked with label-count bounds derived
//!    from their formula;
//! 2. the remaining spots seed envelopes with bounds estimated from their mass.
//!
//! Whatever is left unclaimed becomes its own root.

pub mod charge;
pub mod label;
pub mod ladder;
pub mod mass_index;
pub mod params;
pub mod trackable;
pub mod trimming;

use crate::errors::DataProcessingError;
use crate::models::{
    ElementCounts,
    IsotopeTag,
};
use charge::{
    ChargeQuery,
    estimate_charge,
};
pub use label::{
    IsotopeLabelConfig,
    LabelCountBounds,
    LabelElement,
};
use ladder::{
    LadderWalk,
    is_non_labeled_dominant,
};
use mass_index::MassIndex;
pub use params::{
    IsotopeTrackingParams,
    LadderThresholds,
};
pub use trackable::{
    ChannelSignal,
    IsotopeTrackable,
};
use tracing::{
    debug,
    info,
    warn,
};
use trimming::{
    Envelope,
    trim_envelope,
};

/// Counts of the tags written by one annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    pub roots: usize,
    pub members: usize,
    pub beyond_envelope: usize,
    pub identified_envelopes: usize,
}

struct EnvelopeTracker<'s, T: IsotopeTrackable> {
    spots: &'s [T],
    index: MassIndex,
    tags: Vec<Option<IsotopeTag>>,
    label: &'s IsotopeLabelConfig,
    params: &'s IsotopeTrackingParams,
    mass_difference: f64,
}

impl<'s, T: IsotopeTrackable> EnvelopeTracker<'s, T> {
    fn new(
        spots: &'s [T],
        label: &'s IsotopeLabelConfig,
        params: &'s IsotopeTrackingParams,
        mass_difference: f64,
    ) -> Self {
        Self {
            spots,
            index: MassIndex::new(spots),
            tags: vec![None; spots.len()],
            label,
            params,
            mass_difference,
        }
    }

    fn is_free(&self, pos: usize) -> bool {
        self.tags[pos].is_none()
    }

    fn charge_of(&self, root: usize) -> u8 {
        let root_mass = self.spots[root].mass();
        let query = ChargeQuery {
            root_mass,
            mass_difference: self.mass_difference,
            accuracy: self.params.accuracy_at(root_mass),
            max_charge: self.params.max_charge,
        };
        estimate_charge(
            &self.index,
            |pos| self.spots[pos].mass(),
            |pos| pos != root && self.is_free(pos),
            &query,
        )
    }

    /// Walks, trims and tags the envelope of `root`.
    fn track(&mut self, root: usize, bounds: LabelCountBounds) {
        let charge = self.charge_of(root);
        let walk = LadderWalk {
            root,
            charge,
            mass_difference: self.mass_difference,
            bounds,
            label: self.label,
            params: self.params,
        };
        let members = walk.run(self.spots, &self.index, |pos| self.is_free(pos));
        if !members.is_empty() {
            debug!(
                "Spot {} (z = {}) gathered {} isotopologues",
                self.spots[root].spot_id(),
                charge,
                members.len()
            );
        }
        let envelope = Envelope { root, members };
        for (pos, tag) in trim_envelope(self.spots, &envelope, self.label, &self.params.thresholds) {
            self.tags[pos] = Some(tag);
        }
    }

    fn identified_pass(&mut self) -> usize {
        let spots = self.spots;
        let mut seeded = 0;
        let order = self.index.ascending().to_vec();
        for pos in order {
            let spot = &spots[pos];
            if !self.is_free(pos) || !spot.is_identified_seed() {
                continue;
            }
            seeded += 1;
            let counts = spot.formula().map(ElementCounts::from_formula);
            match counts {
                Some(Ok(counts)) => {
                    let bounds = self.label.element.count_bounds(&counts);
                    self.track(pos, bounds);
                }
                Some(Err(e)) => {
                    warn!("Spot {} has an unreadable formula: {:?}", spot.spot_id(), e);
                    self.tags[pos] = Some(IsotopeTag::root(spot.spot_id()));
                }
                None => {
                    self.tags[pos] = Some(IsotopeTag::root(spot.spot_id()));
                }
            }
        }
        seeded
    }

    fn may_seed(&self, pos: usize) -> bool {
        let Some(labeled_channel) = self.label.fully_labeled_channel else {
            return true;
        };
        let spot = &self.spots[pos];
        is_non_labeled_dominant(
            spot.signal(self.label.non_labeled_channel),
            spot.signal(labeled_channel),
            self.params.thresholds.root_dominance_ratio,
        )
    }

    fn unidentified_pass(&mut self) {
        let order = self.index.ascending().to_vec();
        for pos in order {
            if !self.is_free(pos) || !self.may_seed(pos) {
                continue;
            }
            let counts = ElementCounts::estimate_from_mass(self.spots[pos].mass());
            let bounds = self.label.element.count_bounds(&counts);
            self.track(pos, bounds);
        }
    }

    fn finish(mut self) -> Vec<IsotopeTag> {
        self.tags
            .iter_mut()
            .zip(self.spots.iter())
            .map(|(tag, spot)| *tag.get_or_insert(IsotopeTag::root(spot.spot_id())))
            .collect()
    }
}

/// Writes an isotope tag on every spot of `spots`.
///
/// Fails only when the label has no usable mass difference.
pub fn annotate<T: IsotopeTrackable>(
    spots: &mut [T],
    label: &IsotopeLabelConfig,
    params: &IsotopeTrackingParams,
) -> Result<AnnotationSummary, DataProcessingError> {
    let mass_difference = match label.mass_difference() {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => {
            return Err(DataProcessingError::ExpectedFiniteNonNanData {
                context: format!("Label {:?} needs a positive mass difference", label.element),
            });
        }
    };

    let (tags, identified_envelopes) = {
        let mut tracker = EnvelopeTracker::new(&*spots, label, params, mass_difference);
        let identified = tracker.identified_pass();
        tracker.unidentified_pass();
        (tracker.finish(), identified)
    };

    let mut summary = AnnotationSummary {
        identified_envelopes,
        ..Default::default()
    };
    for (spot, tag) in spots.iter_mut().zip(tags) {
        if tag.is_root() {
            summary.roots += 1;
        } else if tag.is_beyond_envelope() {
            summary.beyond_envelope += 1;
        } else {
            summary.members += 1;
        }
        spot.set_isotope(tag);
    }
    info!(
        "Isotope annotation: {} roots, {} members, {} beyond envelope",
        summary.roots, summary.members, summary.beyond_envelope
    );
    Ok(summary)
}
