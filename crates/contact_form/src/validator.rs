//! Per-field validation rules.
//!
//! `validate` is pure: same field and value always give the same verdict.
//! `Ok(())` means the field has no error.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::field::Field;

/// Validation verdict for a single field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Too short: at least {min} characters")]
    TooShort { min: usize },

    #[error("Too long: at most {max} characters")]
    TooLong { max: usize },

    #[error("Invalid format")]
    InvalidFormat,
}

lazy_static! {
    // local@domain.tld, no whitespace anywhere
    static ref EMAIL_SHAPE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_DIGITS: usize = 15;

/// Validate `value` against the rules of `field`.
pub fn validate(field: Field, value: &str) -> Result<(), FieldError> {
    match field {
        Field::Name | Field::Subject | Field::Message => validate_text(field, value),
        Field::Email => validate_email(value),
        Field::Phone => validate_phone(value),
    }
}

fn validate_text(field: Field, value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    if let Some(min) = field.min_len() {
        if trimmed.chars().count() < min {
            return Err(FieldError::TooShort { min });
        }
    }
    check_ceiling(field, value)
}

fn validate_email(value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    check_ceiling(Field::Email, value)?;
    if !EMAIL_SHAPE.is_match(trimmed) {
        return Err(FieldError::InvalidFormat);
    }
    Ok(())
}

fn validate_phone(value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '(' | ')' | '-' | ' ' | '+');
    if !trimmed.chars().all(allowed) {
        return Err(FieldError::InvalidFormat);
    }
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return Err(FieldError::InvalidFormat);
    }
    Ok(())
}

// Unreachable through FormState (input is capped on entry), kept for direct callers.
fn check_ceiling(field: Field, value: &str) -> Result<(), FieldError> {
    let max = field.max_len();
    if value.chars().count() > max {
        return Err(FieldError::TooLong { max });
    }
    Ok(())
}
