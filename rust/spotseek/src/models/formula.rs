use crate::errors::SpotSeekError;
use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};
use std::str::FromStr;
use std::sync::OnceLock;

// Average element content of small molecules, per dalton of neutral mass.
// Used when a spot has no known formula.
const CARBON_PER_DALTON: f64 = 0.046;
const HYDROGEN_PER_DALTON: f64 = 0.07;
const NITROGEN_PER_DALTON: f64 = 0.006;
const OXYGEN_PER_DALTON: f64 = 0.014;
const SULFUR_PER_DALTON: f64 = 0.0005;

fn element_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z][a-z]?)(\d*)").expect("Element pattern is valid"))
}

/// Element counts of the elements the isotope label heuristics care about.
///
/// Other elements are accepted while parsing and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementCounts {
    pub carbon: u32,
    pub hydrogen: u32,
    pub nitrogen: u32,
    pub oxygen: u32,
    pub sulfur: u32,
}

impl ElementCounts {
    /// Parses a plain formula such as `C6H12O6`.
    pub fn from_formula(formula: &str) -> Result<Self, SpotSeekError> {
        formula.parse()
    }

    /// Rough element composition for a compound of the given neutral mass.
    pub fn estimate_from_mass(mass: f64) -> Self {
        let mass = mass.max(0.0);
        let count = |per_dalton: f64| (mass * per_dalton).round() as u32;
        Self {
            carbon: count(CARBON_PER_DALTON),
            hydrogen: count(HYDROGEN_PER_DALTON),
            nitrogen: count(NITROGEN_PER_DALTON),
            oxygen: count(OXYGEN_PER_DALTON),
            sulfur: count(SULFUR_PER_DALTON),
        }
    }
}

impl FromStr for ElementCounts {
    type Err = SpotSeekError;

    /// Parses a plain formula such as `C6H12O6`. Repeated elements add up.
    fn from_str(formula: &str) -> Result<Self, Self::Err> {
        let trimmed = formula.trim();
        if trimmed.is_empty() {
            return Err(SpotSeekError::ParseError {
                msg: "Empty formula".to_string(),
            });
        }

        let mut counts = ElementCounts::default();
        let mut consumed = 0;
        for cap in element_regex().captures_iter(trimmed) {
            let whole = cap.get(0).map(|m| m.as_str()).unwrap_or_default();
            consumed += whole.len();
            let n: u32 = match cap.get(2).map(|m| m.as_str()) {
                Some("") | None => 1,
                Some(digits) => digits.parse()?,
            };
            match &cap[1] {
                "C" => counts.carbon += n,
                "H" => counts.hydrogen += n,
                "N" => counts.nitrogen += n,
                "O" => counts.oxygen += n,
                "S" => counts.sulfur += n,
                _ => {}
            }
        }

        if consumed != trimmed.len() {
            return Err(SpotSeekError::ParseError {
                msg: format!("Unable to parse formula '{}'", formula),
            });
        }
        Ok(counts)
    }
}
