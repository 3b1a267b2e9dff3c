//! Walk over the predicted isotopologue positions of one root.

use super::label::{
    IsotopeLabelConfig,
    LabelCountBounds,
};
use super::mass_index::MassIndex;
use super::params::{
    IsotopeTrackingParams,
    LadderThresholds,
};
use super::trackable::{
    ChannelSignal,
    IsotopeTrackable,
};

/// Labeled intensity dominates the non-labeled one.
pub fn is_labeled_dominant(non_labeled: ChannelSignal, labeled: ChannelSignal, ratio: f64) -> bool {
    (labeled.detected && !non_labeled.detected) || labeled.intensity > ratio * non_labeled.intensity
}

/// Non-labeled intensity dominates the labeled one.
pub fn is_non_labeled_dominant(non_labeled: ChannelSignal, labeled: ChannelSignal, ratio: f64) -> bool {
    let labeled_only = !non_labeled.detected && labeled.detected;
    !labeled_only && non_labeled.intensity >= ratio * labeled.intensity
}

/// Running state of one ladder walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LadderState {
    /// Last position that received a member (0 for the root).
    pub last_assigned: u32,
    /// Set once the gap since `last_assigned` grew past the finished gap.
    pub finished: bool,
    /// Set once a labeled-dominant candidate was seen.
    pub fully_labeled_fragment: bool,
    /// Missing positions in a row, counted past the skip tracking start.
    pub consecutive_skips: u32,
}

/// What the walk does with one ladder position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Assign(usize),
    Skip,
    Stop,
}

impl LadderState {
    /// Records a position without a usable candidate. `Stop` when the walk should end.
    fn skip(&mut self, position: u32, bounds: LabelCountBounds, thresholds: &LadderThresholds) -> Step {
        if position > thresholds.skip_tracking_start {
            self.consecutive_skips += 1;
            if self.consecutive_skips > thresholds.max_consecutive_skips && position > bounds.min {
                return Step::Stop;
            }
        }
        Step::Skip
    }

    /// Decides what happens at `position` given the best `candidate` found there.
    pub fn step<T: IsotopeTrackable>(
        &mut self,
        position: u32,
        candidate: Option<(usize, &T)>,
        label: &IsotopeLabelConfig,
        bounds: LabelCountBounds,
        thresholds: &LadderThresholds,
    ) -> Step {
        if position.saturating_sub(self.last_assigned) > thresholds.finished_gap {
            self.finished = true;
        }
        let Some((pos, spot)) = candidate else {
            return self.skip(position, bounds, thresholds);
        };

        let non_labeled = spot.signal(label.non_labeled_channel);
        if self.finished && non_labeled.detected {
            return self.skip(position, bounds, thresholds);
        }

        if let Some(labeled_channel) = label.fully_labeled_channel {
            let labeled = spot.signal(labeled_channel);
            let ratio = thresholds.labeled_dominance_ratio;
            if is_labeled_dominant(non_labeled, labeled, ratio) {
                self.fully_labeled_fragment = true;
            } else if self.fully_labeled_fragment && is_non_labeled_dominant(non_labeled, labeled, ratio) {
                return Step::Stop;
            }
        }

        self.last_assigned = position;
        self.consecutive_skips = 0;
        Step::Assign(pos)
    }
}

/// One root and where to look for its isotopologues.
#[derive(Debug, Clone, Copy)]
pub struct LadderWalk<'l> {
    pub root: usize,
    pub charge: u8,
    pub mass_difference: f64,
    pub bounds: LabelCountBounds,
    pub label: &'l IsotopeLabelConfig,
    pub params: &'l IsotopeTrackingParams,
}

impl LadderWalk<'_> {
    /// Positions and ladder weights of the members found for the root, root excluded.
    ///
    /// `is_free` tells whether a spot can still join an envelope.
    pub fn run<T: IsotopeTrackable>(
        &self,
        spots: &[T],
        index: &MassIndex,
        is_free: impl Fn(usize) -> bool,
    ) -> Vec<(usize, u32)> {
        let root = &spots[self.root];
        let root_mass = root.mass();
        let root_rt = root.rt();
        let accuracy = self.params.accuracy_at(root_mass);
        let mut state = LadderState::default();
        let mut members: Vec<(usize, u32)> = Vec::new();

        for position in 1..=self.bounds.max {
            let predicted =
                root_mass + position as f64 * self.mass_difference / self.charge as f64;
            let candidate = index
                .around(predicted, accuracy)
                .iter()
                .copied()
                .filter(|&pos| pos != self.root && is_free(pos))
                .filter(|&pos| {
                    self.params
                        .rt_tolerance
                        .is_unrestricted_or(|tol| (spots[pos].rt() - root_rt).abs() <= *tol)
                })
                .filter(|pos| !members.iter().any(|(m, _)| m == pos))
                .min_by(|&a, &b| {
                    let da = (spots[a].rt() - root_rt).abs();
                    let db = (spots[b].rt() - root_rt).abs();
                    da.total_cmp(&db)
                })
                .map(|pos| (pos, &spots[pos]));

            match state.step(position, candidate, self.label, self.bounds, &self.params.thresholds) {
                Step::Assign(pos) => members.push((pos, position)),
                Step::Skip => {}
                Step::Stop => break,
            }
        }
        members
    }
}
