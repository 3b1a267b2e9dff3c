//! Boundary trimming of a freshly walked envelope.

use super::label::IsotopeLabelConfig;
use super::params::LadderThresholds;
use super::trackable::IsotopeTrackable;
use crate::models::IsotopeTag;

/// Envelopes smaller than this are kept as walked.
pub const MIN_TRIMMABLE_MEMBERS: usize = 3;

/// Span (in ladder positions) an envelope needs before its tail is trimmed.
pub const MIN_TRAILING_SPAN: u32 = 3;

/// Largest weight gap to the current last member the trailing scan crosses.
pub const MAX_TRAILING_GAP: u32 = 2;

/// A root and its members as `(position, ladder weight)`, sorted by weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub root: usize,
    pub members: Vec<(usize, u32)>,
}

impl Envelope {
    fn chain(&self) -> Vec<(usize, u32)> {
        std::iter::once((self.root, 0))
            .chain(self.members.iter().copied())
            .collect()
    }
}

/// Final isotope tags of the envelope, keyed by position.
///
/// A much more intense member at weight 1 or 2 becomes the root (the spots
/// before it are re-encoded as beyond-envelope members of the new root). With a
/// fully-labeled channel, a much more intense member near the tail becomes the
/// last member and everything after it is beyond the envelope.
pub fn trim_envelope<T: IsotopeTrackable>(
    spots: &[T],
    envelope: &Envelope,
    label: &IsotopeLabelConfig,
    thresholds: &LadderThresholds,
) -> Vec<(usize, IsotopeTag)> {
    let chain = envelope.chain();
    let ratio = thresholds.promotion_ratio;
    let mut first = 0;
    let mut last = chain.len() - 1;

    if chain.len() >= MIN_TRIMMABLE_MEMBERS {
        let nl = label.non_labeled_channel;
        for j in 1..chain.len().min(3) {
            let (pos, weight) = chain[j];
            if !(1..=2).contains(&weight) {
                continue;
            }
            let current = spots[chain[first].0].signal(nl).intensity;
            if spots[pos].signal(nl).intensity > ratio * current {
                first = j;
            }
        }

        if let Some(fl) = label.fully_labeled_channel {
            if chain[last].1 - chain[first].1 > MIN_TRAILING_SPAN {
                for j in (first + 1..last).rev() {
                    if chain[last].1 - chain[j].1 > MAX_TRAILING_GAP {
                        break;
                    }
                    let current = spots[chain[last].0].signal(fl).intensity;
                    if spots[chain[j].0].signal(fl).intensity > ratio * current {
                        last = j;
                    }
                }
            }
        }
    }

    let root_id = spots[chain[first].0].spot_id();
    let offset = chain[first].1;
    chain
        .iter()
        .enumerate()
        .map(|(k, &(pos, weight))| {
            let tag = if k == first {
                IsotopeTag::root(root_id)
            } else if k < first {
                IsotopeTag::beyond_envelope(root_id, weight)
            } else if k > last {
                IsotopeTag::beyond_envelope(root_id, weight - offset)
            } else {
                IsotopeTag::member(root_id, weight - offset)
            };
            (pos, tag)
        })
        .collect()
}
