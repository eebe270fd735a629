//! vanity-core - Pricing and quoting for configurable bathroom vanities.
//!
//! This library validates a vanity configuration, prices it against an
//! injected rate table, and exports the result as a PDF quote, a shareable
//! link or an e-mail.
//!
//! # Example
//!
//! ```no_run
//! use vanity_core::{build_quote, render_quote_pdf, Branding, RateTable, VanityConfiguration};
//!
//! let config = VanityConfiguration::default();
//! let quote = build_quote(&config, &RateTable::default(), None, chrono::Utc::now()).unwrap();
//! println!("{} {}", quote.reference, quote.pricing.total_price);
//!
//! let pdf = render_quote_pdf(&quote, &Branding::default()).unwrap();
//! std::fs::write("quote.pdf", pdf).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod pricing;
pub mod validation;

// Re-exports for convenience
pub use config::{Branding, MailSettings, QuoteSettings};
pub use error::{ErrorCategory, ErrorCode, QuoteError, Result};
pub use export::{
    decode_share_link, encode_share_link, render_quote_pdf, render_quote_summary,
    send_quote_email, QuoteMailer, SharedConfiguration,
};
pub use model::{
    Brand, CustomerInfo, Dimension, Money, PricingBreakdown, QuoteArtifact, VanityConfiguration,
};
pub use pricing::{calculate_pricing, PricingCache, PricingSession, RateTable};
pub use validation::{validate_configuration, ValidationResult};

use chrono::{DateTime, Utc};

/// Validate, price and snapshot a configuration as a quote.
///
/// This is the main high-level function that performs the full pipeline:
/// 1. Validate every field against the rate table's limits
/// 2. Price the configuration
/// 3. Freeze the result as a quote artifact with a quote number
///
/// Validation warnings are logged; any field error aborts with
/// `QuoteError::Validation`.
pub fn build_quote(
    config: &VanityConfiguration,
    rates: &RateTable,
    customer: Option<CustomerInfo>,
    created_at: DateTime<Utc>,
) -> Result<QuoteArtifact> {
    let validation = validate_configuration(config, rates);
    for warning in &validation.warnings {
        tracing::warn!("{}", warning);
    }
    validation.into_result()?;

    let pricing = calculate_pricing(config, rates)?;
    let quote = QuoteArtifact::new(config.clone(), pricing, customer, created_at);
    tracing::info!(
        "Built quote {} for {}",
        quote.reference,
        quote.pricing.total_price
    );
    Ok(quote)
}
