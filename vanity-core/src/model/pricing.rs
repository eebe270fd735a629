//! Computed price breakdown for a configuration.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Which part of the breakdown a line item rolls up into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineCategory {
    Cabinet,
    Wall,
    Floor,
    Countertop,
    Fixture,
}

/// A single priced component of the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub category: LineCategory,
    pub description: String,
    pub amount: Money,
}

impl LineItem {
    pub fn new(category: LineCategory, description: impl Into<String>, amount: Money) -> Self {
        Self {
            category,
            description: description.into(),
            amount,
        }
    }
}

/// Complete pricing breakdown for one vanity configuration.
///
/// `subtotal` is the sum of the five component prices and
/// `total_price` is `subtotal + tax + shipping`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub base_price: Money,
    pub wall_price: Money,
    pub floor_price: Money,
    pub countertop_price: Money,
    pub fixtures_price: Money,
    pub subtotal: Money,
    /// Tax rate applied, as a fraction (0.0825 = 8.25%).
    pub tax_rate: f64,
    pub tax: Money,
    pub shipping: Money,
    pub total_price: Money,
    pub line_items: Vec<LineItem>,
}

impl PricingBreakdown {
    /// Sum of line items in one category.
    pub fn category_total(&self, category: LineCategory) -> Money {
        self.line_items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.amount)
            .sum()
    }

    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Tax rate as a display percentage (e.g. "8.25%").
    pub fn tax_rate_label(&self) -> String {
        let percent = format!("{:.3}", self.tax_rate * 100.0);
        let percent = percent.trim_end_matches('0').trim_end_matches('.');
        format!("{}%", percent)
    }

    /// Label/amount rows for the summary tables.
    pub fn summary_rows(&self) -> Vec<(String, Money)> {
        let mut rows = vec![("Vanity Cabinet".to_string(), self.base_price)];
        if self.wall_price.is_positive() {
            rows.push(("Wall Finishing".to_string(), self.wall_price));
        }
        if self.floor_price.is_positive() {
            rows.push(("Floor Tile".to_string(), self.floor_price));
        }
        if self.countertop_price.is_positive() {
            rows.push(("Countertop & Sink".to_string(), self.countertop_price));
        }
        if self.fixtures_price.is_positive() {
            rows.push(("Fixtures".to_string(), self.fixtures_price));
        }
        rows.push(("Subtotal".to_string(), self.subtotal));
        rows.push((format!("Tax ({})", self.tax_rate_label()), self.tax));
        rows.push(("Shipping".to_string(), self.shipping));
        rows
    }
}
