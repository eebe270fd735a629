//! Location to sales-tax rate lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::validation::validate_zip_code;

/// Range of 3-digit zip prefixes belonging to one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipRange {
    pub from: u16,
    pub to: u16,
    pub state: String,
}

impl ZipRange {
    fn new(from: u16, to: u16, state: &str) -> Self {
        Self {
            from,
            to,
            state: state.to_string(),
        }
    }

    fn contains(&self, prefix: u16) -> bool {
        (self.from..=self.to).contains(&prefix)
    }
}

/// Sales-tax rates by state, with zip prefix resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    /// Rate used when the location is unset or unrecognized.
    pub default_rate: f64,
    /// Two-letter state code to rate (0.0725 = 7.25%).
    pub states: BTreeMap<String, f64>,
    pub zip_prefixes: Vec<ZipRange>,
}

impl Default for TaxTable {
    fn default() -> Self {
        let states = [
            ("AZ", 0.056),
            ("CA", 0.0725),
            ("CO", 0.029),
            ("FL", 0.06),
            ("GA", 0.04),
            ("IL", 0.0625),
            ("MA", 0.0625),
            ("MI", 0.06),
            ("NJ", 0.06625),
            ("NV", 0.0685),
            ("NY", 0.04),
            ("OH", 0.0575),
            ("PA", 0.06),
            ("TX", 0.0625),
            ("WA", 0.065),
        ]
        .into_iter()
        .map(|(s, r)| (s.to_string(), r))
        .collect();

        let zip_prefixes = vec![
            ZipRange::new(10, 27, "MA"),
            ZipRange::new(70, 89, "NJ"),
            ZipRange::new(100, 149, "NY"),
            ZipRange::new(150, 196, "PA"),
            ZipRange::new(300, 319, "GA"),
            ZipRange::new(320, 349, "FL"),
            ZipRange::new(398, 399, "GA"),
            ZipRange::new(430, 458, "OH"),
            ZipRange::new(480, 499, "MI"),
            ZipRange::new(600, 629, "IL"),
            ZipRange::new(750, 799, "TX"),
            ZipRange::new(800, 816, "CO"),
            ZipRange::new(850, 865, "AZ"),
            ZipRange::new(885, 885, "TX"),
            ZipRange::new(889, 898, "NV"),
            ZipRange::new(900, 961, "CA"),
            ZipRange::new(980, 994, "WA"),
        ];

        Self {
            default_rate: 0.07,
            states,
            zip_prefixes,
        }
    }
}

impl TaxTable {
    /// Resolve a zip code to its state code.
    pub fn state_for_zip(&self, zip: &str) -> Option<&str> {
        let zip = zip.trim();
        if !validate_zip_code(zip) {
            return None;
        }
        let prefix: u16 = zip[..3].parse().ok()?;
        self.zip_prefixes
            .iter()
            .find(|range| range.contains(prefix))
            .map(|range| range.state.as_str())
    }

    /// Tax rate for a location. The zip code wins over the state; anything
    /// unresolved falls back to the default rate.
    pub fn rate_for(&self, zip_code: Option<&str>, state: Option<&str>) -> f64 {
        let resolved = zip_code
            .and_then(|zip| self.state_for_zip(zip))
            .map(str::to_string)
            .or_else(|| state.map(|s| s.trim().to_uppercase()));

        match resolved.and_then(|code| self.states.get(&code).copied()) {
            Some(rate) => rate,
            None => {
                tracing::debug!(
                    "No tax rate for zip={:?} state={:?}, using default {}",
                    zip_code,
                    state,
                    self.default_rate
                );
                self.default_rate
            }
        }
    }
}
