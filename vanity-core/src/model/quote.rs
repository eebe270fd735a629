//! Quote artifact: an immutable snapshot of a priced configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::configuration::VanityConfiguration;
use super::pricing::PricingBreakdown;

/// Customer contact details attached to a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }
}

/// Encoding of a captured preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
}

/// A captured rendering of the configured vanity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewImage {
    pub format: ImageFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of color components (1 = gray, 3 = RGB, 4 = CMYK).
    pub components: u8,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl PreviewImage {
    /// Height/width ratio, used to scale the image on the page.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        self.height as f64 / self.width as f64
    }
}

/// Point-in-time quote built from a configuration and its pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteArtifact {
    /// Quote number (e.g. "VQ-3F9A12C0").
    pub reference: String,
    pub created_at: DateTime<Utc>,
    pub configuration: VanityConfiguration,
    pub pricing: PricingBreakdown,
    pub customer: Option<CustomerInfo>,
    #[serde(skip)]
    pub preview: Option<PreviewImage>,
}

impl QuoteArtifact {
    /// Snapshot a configuration and its pricing at the given instant.
    pub fn new(
        configuration: VanityConfiguration,
        pricing: PricingBreakdown,
        customer: Option<CustomerInfo>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let reference = quote_reference(&configuration, &created_at);
        Self {
            reference,
            created_at,
            configuration,
            pricing,
            customer,
            preview: None,
        }
    }

    /// Copy of this quote with a preview image attached.
    pub fn with_preview(mut self, preview: Option<PreviewImage>) -> Self {
        self.preview = preview;
        self
    }
}

/// Derive a quote number from the configuration and creation time.
pub fn quote_reference(configuration: &VanityConfiguration, created_at: &DateTime<Utc>) -> String {
    use md5::{Digest, Md5};

    let mut hasher = Md5::new();
    // Serializing a plain struct of strings, integers and enums cannot fail.
    if let Ok(json) = serde_json::to_vec(configuration) {
        hasher.update(&json);
    }
    hasher.update(created_at.to_rfc3339().as_bytes());
    let digest = hasher.finalize();

    let hex: String = digest[..4].iter().map(|b| format!("{:02X}", b)).collect();
    format!("VQ-{}", hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Money;
    use chrono::TimeZone;

    fn sample_pricing() -> PricingBreakdown {
        PricingBreakdown {
            base_price: Money::from_cents(100),
            wall_price: Money::zero(),
            floor_price: Money::zero(),
            countertop_price: Money::zero(),
            fixtures_price: Money::zero(),
            subtotal: Money::from_cents(100),
            tax_rate: 0.0,
            tax: Money::zero(),
            shipping: Money::zero(),
            total_price: Money::from_cents(100),
            line_items: vec![],
        }
    }

    #[test]
    fn test_reference_is_stable() {
        let config = VanityConfiguration::default();
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let a = quote_reference(&config, &at);
        let b = quote_reference(&config, &at);
        assert_eq!(a, b);
        assert!(a.starts_with("VQ-"));
        assert_eq!(a.len(), 11);
    }

    #[test]
    fn test_reference_changes_with_configuration() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let a = quote_reference(&VanityConfiguration::default(), &at);
        let mut other = VanityConfiguration::default();
        other.num_drawers = 3;
        assert_ne!(a, quote_reference(&other, &at));
    }

    #[test]
    fn test_artifact_new() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let artifact = QuoteArtifact::new(
            VanityConfiguration::default(),
            sample_pricing(),
            Some(CustomerInfo::new("Sam", "sam@example.com")),
            at,
        );
        assert_eq!(
            artifact.reference,
            quote_reference(&artifact.configuration, &at)
        );
        assert!(artifact.preview.is_none());
    }

    #[test]
    fn test_preview_aspect_ratio() {
        let image = PreviewImage {
            format: ImageFormat::Jpeg,
            width: 800,
            height: 600,
            components: 3,
            data: vec![],
        };
        assert!((image.aspect_ratio() - 0.75).abs() < 1e-9);
    }
}
