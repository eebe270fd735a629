//! Field validation for vanity configurations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{
    float_cmp, MAX_DIMENSION, MAX_DRAWERS, MAX_SIXTEENTHS, MIN_DIMENSION, ZIP_CODE_LENGTH,
};
use crate::error::{ErrorCode, QuoteError, Result};
use crate::model::{Dimension, VanityConfiguration};
use crate::pricing::RateTable;

/// Kind of field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldErrorKind {
    InvalidDimension,
    InvalidFraction,
    InvalidZip,
    InvalidDrawerCount,
}

/// A validation failure tied to one configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// Build a field error from a check failure.
    fn from_error(field: &str, err: &QuoteError) -> Self {
        let kind = match err.code() {
            ErrorCode::InvalidFraction => FieldErrorKind::InvalidFraction,
            ErrorCode::InvalidZip => FieldErrorKind::InvalidZip,
            _ => FieldErrorKind::InvalidDimension,
        };
        Self::new(field, kind, err.to_string())
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Field errors.
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, error: FieldError) {
        self.errors.push(error);
        self.passed = false;
    }

    /// Record a failed check against a field.
    fn check(&mut self, field: &str, outcome: Result<()>) {
        if let Err(err) = outcome {
            self.add_error(FieldError::from_error(field, &err));
        }
    }

    /// Errors for one field.
    pub fn errors_for(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Convert into a `Result`, failing with every field error.
    pub fn into_result(self) -> Result<()> {
        if self.passed {
            Ok(())
        } else {
            Err(QuoteError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Numeric and within [0, 999].
pub fn validate_dimension(value: f64) -> bool {
    value.is_finite() && (MIN_DIMENSION..=MAX_DIMENSION).contains(&value)
}

/// Integer sixteenths within [0, 15].
pub fn validate_fraction(value: i64) -> bool {
    (0..=MAX_SIXTEENTHS as i64).contains(&value)
}

/// Exactly five ASCII digits.
pub fn validate_zip_code(value: &str) -> bool {
    value.len() == ZIP_CODE_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Loose `local@domain.tld` check for quote recipients.
pub fn validate_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

/// Check a dimension against the absolute and brand-specific limits.
pub fn check_dimension(field: &str, dimension: &Dimension, min: f64, max: f64) -> Result<()> {
    let value = dimension.to_inches();
    if !validate_dimension(value) || !float_cmp::in_range(value, min, max) {
        return Err(QuoteError::InvalidDimension {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Check the sixteenths component of a dimension.
pub fn check_fraction(field: &str, sixteenths: i64) -> Result<()> {
    if !validate_fraction(sixteenths) {
        return Err(QuoteError::InvalidFraction {
            field: field.to_string(),
            value: sixteenths,
        });
    }
    Ok(())
}

pub fn check_zip_code(value: &str) -> Result<()> {
    if !validate_zip_code(value) {
        return Err(QuoteError::InvalidZip {
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn check_email(value: &str) -> Result<()> {
    if !validate_email(value) {
        return Err(QuoteError::InvalidEmail {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validate every field of a configuration.
///
/// Never fails: problems are reported as field errors so the caller can show
/// them inline and keep the last valid price.
pub fn validate_configuration(config: &VanityConfiguration, rates: &RateTable) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let bounds = rates.brand(config.brand).map(|b| &b.bounds);
    let dimensions = [
        ("width", &config.width),
        ("height", &config.height),
        ("depth", &config.depth),
    ];

    for (field, dimension) in dimensions {
        result.check(field, check_fraction(field, dimension.sixteenths as i64));

        let (min, max) = match bounds.map(|b| b.range_for(field)) {
            Some(range) => range,
            None => (MIN_DIMENSION, MAX_DIMENSION),
        };
        result.check(field, check_dimension(field, dimension, min, max));
    }

    if config.num_drawers > MAX_DRAWERS {
        result.add_error(FieldError::new(
            "num_drawers",
            FieldErrorKind::InvalidDrawerCount,
            format!(
                "{} drawers requested (allowed 0 to {})",
                config.num_drawers, MAX_DRAWERS
            ),
        ));
    }

    if config.include_room {
        for (field, value) in [
            ("room_length", config.room_length),
            ("room_width", config.room_width),
        ] {
            // Whole inches; only the absolute limit applies, not brand ranges.
            if value == 0 {
                result.add_error(FieldError::new(
                    field,
                    FieldErrorKind::InvalidDimension,
                    "Room dimensions must be positive when the room is included",
                ));
            } else if !validate_dimension(value as f64) {
                result.add_error(FieldError::new(
                    field,
                    FieldErrorKind::InvalidDimension,
                    format!(
                        "{}\" is outside the allowed room range ({} to {})",
                        value, MIN_DIMENSION, MAX_DIMENSION
                    ),
                ));
            }
        }
        if config.floor_tile_style.trim().is_empty() {
            result.add_warning(format!(
                "No floor tile style selected; priced as {}",
                rates.default_floor_tile
            ));
        }
    } else if config.room_length > 0 || config.room_width > 0 {
        result.add_warning("Room dimensions are ignored because the room is not included");
    }

    if let Some(zip) = &config.zip_code {
        result.check("zip_code", check_zip_code(zip));
    } else if config.state.is_none() {
        result.add_warning("No location given; the default tax rate applies");
    }

    if config.cabinet_position == crate::model::CabinetPosition::WallMounted
        && config.height.to_inches() > 40.0
    {
        result.add_warning("Wall-mounted cabinets taller than 40\" need extra blocking");
    }

    result
}

/// Validate and fail on the first invalid configuration.
pub fn ensure_valid(config: &VanityConfiguration, rates: &RateTable) -> Result<()> {
    validate_configuration(config, rates).into_result()
}
