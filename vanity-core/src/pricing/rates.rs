//! Rate tables driving the pricing engine.
//!
//! All amounts are in cents. Tables are plain data so a market can supply its
//! own (`[rates]` in the settings file) without touching the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::shipping::ShippingTiers;
use super::tax::TaxTable;
use crate::error::{QuoteError, Result};
use crate::model::{Brand, FixtureKind, Money};

/// Allowed range for one dimension, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InchRange {
    pub min: f64,
    pub max: f64,
}

impl InchRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Brand-specific size limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionBounds {
    pub width: InchRange,
    pub height: InchRange,
    pub depth: InchRange,
}

impl Default for DimensionBounds {
    fn default() -> Self {
        Self {
            width: InchRange::new(18.0, 120.0),
            height: InchRange::new(24.0, 48.0),
            depth: InchRange::new(12.0, 30.0),
        }
    }
}

impl DimensionBounds {
    /// (min, max) for a field name; unknown fields are unbounded.
    pub fn range_for(&self, field: &str) -> (f64, f64) {
        let range = match field {
            "width" => self.width,
            "height" => self.height,
            "depth" => self.depth,
            _ => InchRange::new(crate::config::MIN_DIMENSION, crate::config::MAX_DIMENSION),
        };
        (range.min, range.max)
    }
}

/// Pricing for one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRates {
    /// Fixed cost of a cabinet box regardless of size.
    pub unit_base: Money,
    pub per_linear_foot: Money,
    #[serde(default)]
    pub bounds: DimensionBounds,
    /// Finish key to price multiplier.
    pub finishes: BTreeMap<String, f64>,
}

impl BrandRates {
    fn new(unit_base: i64, per_linear_foot: i64, finishes: &[(&str, f64)]) -> Self {
        Self {
            unit_base: Money::from_cents(unit_base),
            per_linear_foot: Money::from_cents(per_linear_foot),
            bounds: DimensionBounds::default(),
            finishes: finishes
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

/// Countertop, edge and sink pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountertopRates {
    /// Material key to price per square foot.
    pub materials: BTreeMap<String, Money>,
    /// Edge profile key to price per linear foot of exposed edge.
    pub edges: BTreeMap<String, Money>,
    /// Sink style key to unit price.
    pub sinks: BTreeMap<String, Money>,
    /// Sink shape key to surcharge.
    pub sink_shapes: BTreeMap<String, Money>,
    /// Front overhang added to the cabinet depth, in inches.
    pub overhang: f64,
}

impl Default for CountertopRates {
    fn default() -> Self {
        Self {
            materials: money_map(&[
                ("quartz", 75_00),
                ("granite", 65_00),
                ("marble", 90_00),
                ("solid-surface", 45_00),
                ("laminate", 25_00),
            ]),
            edges: money_map(&[
                ("eased", 0),
                ("bevel", 8_00),
                ("bullnose", 12_00),
                ("ogee", 20_00),
                ("mitered", 30_00),
            ]),
            sinks: money_map(&[
                ("undermount", 250_00),
                ("vessel", 320_00),
                ("integrated", 400_00),
                ("drop-in", 180_00),
            ]),
            sink_shapes: money_map(&[
                ("rectangular", 0),
                ("oval", 0),
                ("square", 25_00),
                ("round", 25_00),
            ]),
            overhang: 1.0,
        }
    }
}

/// Every coefficient the pricing engine uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Brand key to brand pricing.
    pub brands: BTreeMap<String, BrandRates>,
    /// Cabinet height at which the size factor is 1.0.
    pub reference_height: f64,
    /// Cabinet depth at which the size factor is 1.0.
    pub reference_depth: f64,
    /// Door style key to surcharge.
    pub door_styles: BTreeMap<String, Money>,
    pub per_drawer: Money,
    /// Handle style key to price per handle.
    pub handles: BTreeMap<String, Money>,
    pub wall_mount_surcharge: Money,
    /// Finished wall height, in inches.
    pub wall_height: f64,
    pub wall_finish_per_sqft: Money,
    /// Tile style key to price per square foot.
    pub floor_tiles: BTreeMap<String, Money>,
    /// Tile priced when none is selected.
    pub default_floor_tile: String,
    pub countertop: CountertopRates,
    /// Fixture kind key to (style key to price).
    pub fixtures: BTreeMap<String, BTreeMap<String, Money>>,
    pub tax: TaxTable,
    pub shipping: ShippingTiers,
}

impl Default for RateTable {
    fn default() -> Self {
        let wood = [
            ("white", 1.0),
            ("natural-oak", 1.10),
            ("walnut", 1.20),
            ("matte-black", 1.15),
        ];

        let mut brands = BTreeMap::new();
        brands.insert(
            Brand::Tafisa.key().to_string(),
            BrandRates::new(
                350_00,
                180_00,
                &[
                    ("white", 1.0),
                    ("natural-oak", 1.10),
                    ("walnut", 1.20),
                    ("grey-elm", 1.10),
                ],
            ),
        );
        brands.insert(
            Brand::Egger.key().to_string(),
            BrandRates::new(
                400_00,
                200_00,
                &[
                    ("white", 1.0),
                    ("natural-oak", 1.12),
                    ("walnut", 1.22),
                    ("concrete", 1.15),
                ],
            ),
        );
        let mut shinnoki = BrandRates::new(
            600_00,
            320_00,
            &[
                ("natural-oak", 1.0),
                ("ivory-oak", 1.05),
                ("smoked-oak", 1.08),
                ("walnut", 1.12),
            ],
        );
        // Veneer panels are cut from 8' sheets.
        shinnoki.bounds.width = InchRange::new(18.0, 96.0);
        brands.insert(Brand::Shinnoki.key().to_string(), shinnoki);
        brands.insert(
            Brand::Blum.key().to_string(),
            BrandRates::new(500_00, 260_00, &wood),
        );
        brands.insert(
            Brand::Hafele.key().to_string(),
            BrandRates::new(650_00, 340_00, &wood),
        );

        let mut fixtures = BTreeMap::new();
        let fixture_rows: [(FixtureKind, &[(&str, i64)]); 6] = [
            (
                FixtureKind::Toilet,
                &[("one-piece", 450_00), ("two-piece", 320_00), ("wall-hung", 780_00)],
            ),
            (
                FixtureKind::Shower,
                &[("standard", 1_200_00), ("glass-enclosure", 1_850_00), ("walk-in", 2_400_00)],
            ),
            (
                FixtureKind::Bathtub,
                &[("alcove", 900_00), ("freestanding", 1_600_00), ("clawfoot", 2_100_00)],
            ),
            (
                FixtureKind::Mirror,
                &[("frameless", 120_00), ("framed", 180_00), ("backlit", 380_00)],
            ),
            (
                FixtureKind::Faucet,
                &[
                    ("chrome", 140_00),
                    ("brushed-nickel", 175_00),
                    ("matte-black", 190_00),
                    ("brushed-gold", 230_00),
                ],
            ),
            (
                FixtureKind::Backsplash,
                &[("subway-tile", 260_00), ("glass-tile", 340_00), ("marble", 420_00)],
            ),
        ];
        for (kind, styles) in fixture_rows {
            fixtures.insert(kind.key().to_string(), money_map(styles));
        }

        Self {
            brands,
            reference_height: 34.5,
            reference_depth: 21.0,
            door_styles: money_map(&[
                ("shaker", 120_00),
                ("flat-panel", 0),
                ("raised-panel", 180_00),
                ("beadboard", 150_00),
                ("double", 90_00),
                ("single", 0),
                ("drawers", 220_00),
            ]),
            per_drawer: Money::from_cents(85_00),
            handles: money_map(&[
                ("none", 0),
                ("bar", 18_00),
                ("knob", 12_00),
                ("cup", 22_00),
                ("edge-pull", 26_00),
                ("recessed", 30_00),
            ]),
            wall_mount_surcharge: Money::from_cents(150_00),
            wall_height: 96.0,
            wall_finish_per_sqft: Money::from_cents(4_50),
            floor_tiles: money_map(&[
                ("porcelain", 9_00),
                ("ceramic", 7_00),
                ("white-marble", 18_00),
                ("slate", 14_00),
                ("hexagon-mosaic", 16_00),
                ("wood-look", 11_00),
            ]),
            default_floor_tile: "porcelain".to_string(),
            countertop: CountertopRates::default(),
            fixtures,
            tax: TaxTable::default(),
            shipping: ShippingTiers::default(),
        }
    }
}

impl RateTable {
    /// Parse a rate table from JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Pricing for a brand, if the market carries it.
    pub fn brand(&self, brand: Brand) -> Option<&BrandRates> {
        self.brands.get(brand.key())
    }

    /// Brand pricing plus the finish multiplier for a brand/finish pair.
    pub fn material(&self, brand: Brand, finish: &str) -> Result<(&BrandRates, f64)> {
        let invalid = || QuoteError::InvalidMaterial {
            brand: brand.key().to_string(),
            finish: finish.to_string(),
        };
        let rates = self.brand(brand).ok_or_else(invalid)?;
        let multiplier = rates.finishes.get(finish).copied().ok_or_else(invalid)?;
        if multiplier <= 0.0 {
            return Err(invalid());
        }
        Ok((rates, multiplier))
    }

    /// Finish keys offered for a brand.
    pub fn finishes_for(&self, brand: Brand) -> Vec<&str> {
        self.brand(brand)
            .map(|b| b.finishes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Look up a priced option, failing with the option category.
pub(crate) fn lookup(table: &BTreeMap<String, Money>, category: &str, key: &str) -> Result<Money> {
    table
        .get(key)
        .copied()
        .ok_or_else(|| QuoteError::UnknownOption {
            category: category.to_string(),
            key: key.to_string(),
        })
}

fn money_map(rows: &[(&str, i64)]) -> BTreeMap<String, Money> {
    rows.iter()
        .map(|(k, cents)| (k.to_string(), Money::from_cents(*cents)))
        .collect()
}
