//! Caller-side memoization for live repricing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::engine::calculate_pricing;
use super::rates::RateTable;
use crate::error::{QuoteError, Result};
use crate::model::{PricingBreakdown, VanityConfiguration};
use crate::validation::{validate_configuration, FieldError};

/// Hit/miss counters for a [`PricingCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

struct Slot {
    key: u64,
    config: VanityConfiguration,
    pricing: Arc<PricingBreakdown>,
}

/// Single-slot cache: repricing an unchanged configuration returns the
/// previous breakdown by reference.
pub struct PricingCache {
    rates: Arc<RateTable>,
    slot: Option<Slot>,
    stats: CacheStats,
}

impl PricingCache {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self {
            rates,
            slot: None,
            stats: CacheStats::default(),
        }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Price a configuration, reusing the cached breakdown when every field
    /// matches. Failures are not cached and leave the slot untouched.
    pub fn price(&mut self, config: &VanityConfiguration) -> Result<Arc<PricingBreakdown>> {
        let key = structural_hash(config);
        if let Some(slot) = &self.slot {
            if slot.key == key && slot.config == *config {
                self.stats.hits += 1;
                return Ok(Arc::clone(&slot.pricing));
            }
        }

        self.stats.misses += 1;
        let pricing = Arc::new(calculate_pricing(config, &self.rates)?);
        self.slot = Some(Slot {
            key,
            config: config.clone(),
            pricing: Arc::clone(&pricing),
        });
        Ok(pricing)
    }

    /// Drop the cached breakdown.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Swap in a new rate table; the cached breakdown no longer applies.
    pub fn set_rates(&mut self, rates: Arc<RateTable>) {
        self.rates = rates;
        self.invalidate();
    }
}

fn structural_hash(config: &VanityConfiguration) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.hash(&mut hasher);
    hasher.finish()
}

/// Outcome of one live repricing step.
#[derive(Debug)]
pub struct PriceUpdate {
    /// Current price, or the last valid one when `stale` is set.
    pub pricing: Option<Arc<PricingBreakdown>>,
    /// True when the shown price does not reflect the latest configuration.
    pub stale: bool,
    pub errors: Vec<FieldError>,
    pub warnings: Vec<String>,
    /// Pricing failure for an otherwise valid configuration.
    pub failure: Option<QuoteError>,
}

impl PriceUpdate {
    pub fn is_current(&self) -> bool {
        !self.stale && self.pricing.is_some()
    }
}

/// Validates, prices and freezes the last valid price while a configuration
/// is being edited.
pub struct PricingSession {
    cache: PricingCache,
    last_valid: Option<Arc<PricingBreakdown>>,
}

impl PricingSession {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self {
            cache: PricingCache::new(rates),
            last_valid: None,
        }
    }

    pub fn last_valid(&self) -> Option<&Arc<PricingBreakdown>> {
        self.last_valid.as_ref()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Reprice after a configuration change.
    pub fn update(&mut self, config: &VanityConfiguration) -> PriceUpdate {
        let validation = validate_configuration(config, self.cache.rates());
        if !validation.passed {
            tracing::debug!(
                "Keeping last valid price, {} field error(s)",
                validation.errors.len()
            );
            return PriceUpdate {
                pricing: self.last_valid.clone(),
                stale: true,
                errors: validation.errors,
                warnings: validation.warnings,
                failure: None,
            };
        }

        match self.cache.price(config) {
            Ok(pricing) => {
                self.last_valid = Some(Arc::clone(&pricing));
                PriceUpdate {
                    pricing: Some(pricing),
                    stale: false,
                    errors: Vec::new(),
                    warnings: validation.warnings,
                    failure: None,
                }
            }
            Err(err) => {
                tracing::debug!("Pricing failed, keeping last valid price: {}", err);
                PriceUpdate {
                    pricing: self.last_valid.clone(),
                    stale: true,
                    errors: Vec::new(),
                    warnings: validation.warnings,
                    failure: Some(err),
                }
            }
        }
    }
}
