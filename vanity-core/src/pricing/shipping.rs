//! Tiered shipping rates.

use serde::{Deserialize, Serialize};

use crate::model::Money;

/// Flat-rate shipping with a free tier and an oversize surcharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingTiers {
    /// Subtotal at or above which shipping is free.
    pub free_threshold: Money,
    pub flat_rate: Money,
    /// Cabinets wider than this (inches) ship as oversize freight.
    pub oversize_width: f64,
    pub oversize_surcharge: Money,
}

impl Default for ShippingTiers {
    fn default() -> Self {
        Self {
            free_threshold: Money::from_cents(5_000_00),
            flat_rate: Money::from_cents(149_00),
            oversize_width: 72.0,
            oversize_surcharge: Money::from_cents(100_00),
        }
    }
}

impl ShippingTiers {
    /// Shipping charge for a subtotal and cabinet width.
    pub fn quote(&self, subtotal: Money, width_inches: f64) -> Money {
        if subtotal >= self.free_threshold {
            return Money::zero();
        }
        if width_inches > self.oversize_width {
            self.flat_rate + self.oversize_surcharge
        } else {
            self.flat_rate
        }
    }
}
