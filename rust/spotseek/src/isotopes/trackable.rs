use crate::models::{
    AlignmentSpot,
    IsotopeTag,
    PeakSpot,
};

/// Detection status and intensity of a spot in one reference channel.
///
/// A channel is a sample position for aligned spots. Missing channels read as
/// undetected with zero intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelSignal {
    pub detected: bool,
    pub intensity: f64,
}

/// A spot the isotope annotator can group into envelopes.
///
/// The annotator reads everything and only ever writes the isotope tag.
pub trait IsotopeTrackable {
    fn spot_id(&self) -> usize;
    fn mass(&self) -> f64;
    fn rt(&self) -> f64;
    fn set_isotope(&mut self, tag: IsotopeTag);
    fn channel(&self, idx: usize) -> Option<ChannelSignal>;

    /// Identified, detected in its representative channel and not excluded.
    fn is_identified_seed(&self) -> bool {
        false
    }

    /// Molecular formula of the identification, when known.
    fn formula(&self) -> Option<&str> {
        None
    }

    fn signal(&self, idx: usize) -> ChannelSignal {
        self.channel(idx).unwrap_or_default()
    }
}

impl IsotopeTrackable for PeakSpot {
    fn spot_id(&self) -> usize {
        self.id
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn rt(&self) -> f64 {
        self.apex.time
    }

    fn set_isotope(&mut self, tag: IsotopeTag) {
        self.isotope = Some(tag);
    }

    /// A single run only has channel 0, the apex intensity.
    fn channel(&self, idx: usize) -> Option<ChannelSignal> {
        (idx == 0).then_some(ChannelSignal {
            detected: true,
            intensity: self.apex.intensity,
        })
    }
}

impl IsotopeTrackable for AlignmentSpot {
    fn spot_id(&self) -> usize {
        self.id
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn rt(&self) -> f64 {
        self.rt
    }

    fn set_isotope(&mut self, tag: IsotopeTag) {
        self.isotope = Some(tag);
    }

    fn channel(&self, idx: usize) -> Option<ChannelSignal> {
        self.peaks.get(idx).map(|p| ChannelSignal {
            detected: p.detected,
            intensity: p.intensity,
        })
    }

    fn is_identified_seed(&self) -> bool {
        self.identification.is_some() && self.representative_detected() && !self.excluded
    }

    fn formula(&self) -> Option<&str> {
        self.identification
            .as_ref()
            .and_then(|id| id.formula.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AlignedPeak,
        Identification,
    };

    #[test]
    fn test_alignment_spot_seed() {
        let mut spot = AlignmentSpot {
            id: 3,
            mass: 180.06,
            rt: 2.0,
            representative_sample: 1,
            excluded: false,
            peaks: vec![
                AlignedPeak {
                    sample: 0,
                    detected: false,
                    intensity: 0.0,
                },
                AlignedPeak {
                    sample: 1,
                    detected: true,
                    intensity: 500.0,
                },
            ],
            identification: Some(Identification {
                library_id: 7,
                formula: Some("C6H12O6".to_string()),
                name: "glucose".to_string(),
            }),
            isotope: None,
        };
        assert!(spot.is_identified_seed());
        assert_eq!(spot.formula(), Some("C6H12O6"));
        assert_eq!(spot.signal(1).intensity, 500.0);
        assert!(!spot.signal(5).detected);

        spot.excluded = true;
        assert!(!spot.is_identified_seed());
        spot.excluded = false;
        spot.representative_sample = 0;
        assert!(!spot.is_identified_seed());
    }
}
