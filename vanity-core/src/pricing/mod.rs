//! Pricing engine module.

mod engine;
mod memo;
mod rates;
mod shipping;
mod tax;

pub use engine::calculate_pricing;
pub use memo::{CacheStats, PriceUpdate, PricingCache, PricingSession};
pub use rates::{BrandRates, CountertopRates, DimensionBounds, InchRange, RateTable};
pub use shipping::ShippingTiers;
pub use tax::{TaxTable, ZipRange};
