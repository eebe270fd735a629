//! Configuration validation module.

mod validate;

pub use validate::{
    check_dimension, check_email, check_fraction, check_zip_code, ensure_valid,
    validate_configuration, validate_dimension, validate_email, validate_fraction,
    validate_zip_code, FieldError, FieldErrorKind, ValidationResult,
};
