//! Configuration constants and settings for the quote pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{QuoteError, Result};
use crate::pricing::RateTable;

/// Floating-point comparison epsilon.
pub const EPS: f64 = 0.0001;

/// Smallest value any dimension field accepts.
pub const MIN_DIMENSION: f64 = 0.0;

/// Largest value any dimension field accepts.
pub const MAX_DIMENSION: f64 = 999.0;

/// Largest fractional component, in sixteenths of an inch.
pub const MAX_SIXTEENTHS: u8 = 15;

/// Largest drawer count a cabinet can carry.
pub const MAX_DRAWERS: u8 = 6;

/// Number of digits in a US zip code.
pub const ZIP_CODE_LENGTH: usize = 5;

/// Current share link schema version.
pub const SHARE_LINK_VERSION: u32 = 1;

/// Query parameter carrying a shared configuration.
pub const SHARE_QUERY_PARAM: &str = "config";

/// Default landing page for shared configurations.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://www.example.com/vanity-designer";

/// Environment variable holding the mail endpoint key.
pub const DEFAULT_MAIL_API_KEY_ENV: &str = "VANITY_MAIL_API_KEY";

/// Company details printed on PDFs and e-mails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub company_name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company_name: "Custom Cabinetry Studio".to_string(),
            tagline: "Custom Bathroom Vanities".to_string(),
            email: "quotes@example.com".to_string(),
            phone: "(555) 010-0199".to_string(),
            website: "www.example.com".to_string(),
        }
    }
}

impl Branding {
    /// One-line contact string for page footers.
    pub fn contact_line(&self) -> String {
        format!("{} | {} | {}", self.phone, self.email, self.website)
    }
}

/// Mail collaborator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    /// HTTP endpoint accepting quote e-mail requests.
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the bearer key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: DEFAULT_MAIL_API_KEY_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

impl MailSettings {
    /// Read the bearer key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Top-level quote settings, usually loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    pub branding: Branding,
    pub share_base_url: String,
    pub mail: MailSettings,
    /// Market-specific rate table; the built-in catalog when absent.
    pub rates: Option<RateTable>,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            mail: MailSettings::default(),
            rates: None,
        }
    }
}

impl QuoteSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(QuoteError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded settings from {} (custom rates: {})",
            path.display(),
            settings.rates.is_some()
        );
        Ok(settings)
    }

    /// The rate table in effect for these settings.
    pub fn rate_table(&self) -> RateTable {
        self.rates.clone().unwrap_or_default()
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if a is in range [min, max] with epsilon tolerance.
    #[inline]
    pub fn in_range(a: f64, min: f64, max: f64) -> bool {
        a >= min - EPS && a <= max + EPS
    }
}
