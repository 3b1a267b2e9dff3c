use crate::models::ElementCounts;
use serde::{
    Deserialize,
    Serialize,
};

/// Element (or element pair) carrying the isotope label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelElement {
    #[default]
    Carbon13,
    Nitrogen15,
    Sulfur34,
    Oxygen18,
    Deuterium,
    Carbon13Nitrogen15,
}

impl LabelElement {
    /// Mass shift of one label unit. Mixed labels have no single shift.
    pub fn default_mass_difference(&self) -> Option<f64> {
        match self {
            Self::Carbon13 => Some(1.003355),
            Self::Nitrogen15 => Some(0.997035),
            Self::Sulfur34 => Some(1.995796),
            Self::Oxygen18 => Some(2.004245),
            Self::Deuterium => Some(1.006277),
            Self::Carbon13Nitrogen15 => None,
        }
    }

    /// Range of label counts worth walking for a compound of the given composition.
    pub fn count_bounds(&self, counts: &ElementCounts) -> LabelCountBounds {
        match self {
            Self::Carbon13 => LabelCountBounds::around(counts.carbon, 5),
            Self::Nitrogen15 => LabelCountBounds { min: 0, max: 10 },
            Self::Sulfur34 => LabelCountBounds { min: 0, max: 5 },
            Self::Oxygen18 => LabelCountBounds {
                min: 0,
                max: counts.oxygen + 2,
            },
            Self::Deuterium => LabelCountBounds {
                min: 0,
                max: counts.hydrogen,
            },
            Self::Carbon13Nitrogen15 => LabelCountBounds::around(counts.carbon + counts.nitrogen, 5),
        }
    }
}

/// Inclusive range of ladder positions.
///
/// `max` is the last position walked, `min` the position before which the
/// walk never terminates early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelCountBounds {
    pub min: u32,
    pub max: u32,
}

impl LabelCountBounds {
    fn around(center: u32, slack: u32) -> Self {
        Self {
            min: center.saturating_sub(slack),
            max: center + slack,
        }
    }
}

/// Labeling setup of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsotopeLabelConfig {
    pub element: LabelElement,
    /// Overrides the element's default label mass shift. Required for mixed labels.
    pub mass_difference: Option<f64>,
    /// Channel holding the non-labeled reference.
    pub non_labeled_channel: usize,
    /// Channel holding the fully-labeled reference, when the experiment has one.
    pub fully_labeled_channel: Option<usize>,
}

impl Default for IsotopeLabelConfig {
    fn default() -> Self {
        Self {
            element: LabelElement::Carbon13,
            mass_difference: None,
            non_labeled_channel: 0,
            fully_labeled_channel: None,
        }
    }
}

impl IsotopeLabelConfig {
    pub fn mass_difference(&self) -> Option<f64> {
        self.mass_difference
            .or_else(|| self.element.default_mass_difference())
    }
}
