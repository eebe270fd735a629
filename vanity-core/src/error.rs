//! Error types for vanity pricing and quote export.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::FieldError;

/// Error codes for quote processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Malformed JSON or TOML input (-3)
    ParseError = -3,
    /// Dimension outside the allowed range (E100)
    InvalidDimension = 100,
    /// Fraction outside 0-15 sixteenths (E101)
    InvalidFraction = 101,
    /// Zip code is not five digits (E102)
    InvalidZip = 102,
    /// Recipient address is malformed (E103)
    InvalidEmail = 103,
    /// Several field errors at once (E110)
    ValidationFailed = 110,
    /// Unknown brand/finish pair (E200)
    InvalidMaterial = 200,
    /// Unknown option key in a rate table (E201)
    UnknownOption = 201,
    /// Preview image could not be captured (E300)
    PreviewCaptureFailed = 300,
    /// Mail collaborator rejected or failed the send (E301)
    MailSendFailed = 301,
    /// Share link could not be decoded (E302)
    LinkDecodeFailed = 302,
    /// Share base URL is not a valid absolute URL (E303)
    InvalidShareUrl = 303,
    /// PDF document could not be serialized (E304)
    PdfRenderFailed = 304,
}

/// Broad family an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Pricing,
    Export,
    Io,
}

/// Main error type for the quote pipeline.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid dimension for '{field}': {value} (allowed {min} to {max})")]
    InvalidDimension {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid fraction for '{field}': {value} sixteenths (allowed 0 to 15)")]
    InvalidFraction { field: String, value: i64 },

    #[error("Invalid zip code: '{value}'")]
    InvalidZip { value: String },

    #[error("Invalid e-mail address: '{value}'")]
    InvalidEmail { value: String },

    #[error("Configuration has {} invalid field(s)", .errors.len())]
    Validation { errors: Vec<FieldError> },

    #[error("No price defined for brand '{brand}' with finish '{finish}'")]
    InvalidMaterial { brand: String, finish: String },

    #[error("Unknown {category} option: '{key}'")]
    UnknownOption { category: String, key: String },

    #[error("Preview capture failed: {message}")]
    PreviewCaptureFailed { message: String },

    #[error("Mail send failed: {message}")]
    MailSendFailed { message: String },

    #[error("Share link decode failed: {message}")]
    LinkDecodeFailed { message: String },

    #[error("Invalid share URL '{url}': {message}")]
    InvalidShareUrl { url: String, message: String },

    #[error("PDF render failed: {message}")]
    PdfRenderFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Config(#[from] toml::de::Error),
}

impl QuoteError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuoteError::FileNotFound { .. } => ErrorCode::FileNotFound,
            QuoteError::InvalidDimension { .. } => ErrorCode::InvalidDimension,
            QuoteError::InvalidFraction { .. } => ErrorCode::InvalidFraction,
            QuoteError::InvalidZip { .. } => ErrorCode::InvalidZip,
            QuoteError::InvalidEmail { .. } => ErrorCode::InvalidEmail,
            QuoteError::Validation { .. } => ErrorCode::ValidationFailed,
            QuoteError::InvalidMaterial { .. } => ErrorCode::InvalidMaterial,
            QuoteError::UnknownOption { .. } => ErrorCode::UnknownOption,
            QuoteError::PreviewCaptureFailed { .. } => ErrorCode::PreviewCaptureFailed,
            QuoteError::MailSendFailed { .. } => ErrorCode::MailSendFailed,
            QuoteError::LinkDecodeFailed { .. } => ErrorCode::LinkDecodeFailed,
            QuoteError::InvalidShareUrl { .. } => ErrorCode::InvalidShareUrl,
            QuoteError::PdfRenderFailed { .. } => ErrorCode::PdfRenderFailed,
            QuoteError::Io(_) => ErrorCode::FileNotFound,
            QuoteError::Json(_) => ErrorCode::ParseError,
            QuoteError::Config(_) => ErrorCode::ParseError,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Get the family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            ErrorCode::InvalidDimension
            | ErrorCode::InvalidFraction
            | ErrorCode::InvalidZip
            | ErrorCode::InvalidEmail
            | ErrorCode::ValidationFailed => ErrorCategory::Validation,
            ErrorCode::InvalidMaterial | ErrorCode::UnknownOption => ErrorCategory::Pricing,
            ErrorCode::PreviewCaptureFailed
            | ErrorCode::MailSendFailed
            | ErrorCode::LinkDecodeFailed
            | ErrorCode::InvalidShareUrl
            | ErrorCode::PdfRenderFailed => ErrorCategory::Export,
            ErrorCode::FileNotFound | ErrorCode::ParseError => ErrorCategory::Io,
        }
    }

    /// Whether the caller can carry on without the failed output.
    ///
    /// A missing preview only drops the image from the PDF and a bad share
    /// link only means "no shared configuration".
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuoteError::PreviewCaptureFailed { .. } | QuoteError::LinkDecodeFailed { .. }
        )
    }
}

/// Result type alias for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;
