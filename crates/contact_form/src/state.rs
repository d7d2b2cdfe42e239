//! Form runtime (mutable) state.
//!
//! This module contains the data structures representing the *current
//! editing state* of a contact form session:
//!   * Captured field values (`FormData`)
//!   * Touched flags and per-field validation errors (`ValidationState`)
//!
//! Both are owned by `FormState` and are always reset together.
//!
//! Typical usage:
//! ```ignore
//! let mut state = FormState::default();
//! state.update_field(Field::Name, "John Silva");
//! state.handle_blur(Field::Name);
//! if state.validate_all() {
//!     let snapshot = state.snapshot();
//! }
//! ```
//
// NOTE: Keep this module free of UI / rendering concerns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field::{self, Field};
use crate::validator::{self, FieldError};

/// Captured values of the five form fields.
///
/// `phone` is optional; an empty string means "not given".
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        }
    }

    /// The phone number, if one was entered.
    pub fn phone(&self) -> Option<&str> {
        let trimmed = self.phone.trim();
        (!trimmed.is_empty()).then_some(self.phone.as_str())
    }

    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        Field::all().all(|f| self.get(f).is_empty())
    }
}

/// Touched flags + current violations, keyed by field.
///
/// An absent entry in `errors` means "valid or not yet evaluated".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationState {
    pub touched: HashMap<Field, bool>,
    pub errors: HashMap<Field, FieldError>,
}

impl ValidationState {
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.get(&field).copied().unwrap_or(false)
    }

    pub fn error(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// The error a front-end should display: only once the field was touched.
    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        if self.is_touched(field) {
            self.error(field)
        } else {
            None
        }
    }

    /// True when nothing is touched and no error is recorded.
    pub fn is_clear(&self) -> bool {
        !self.touched.values().any(|t| *t) && self.errors.is_empty()
    }
}

/// Editing state of one form session.
#[derive(Debug, Default, Clone)]
pub struct FormState {
    data: FormData,
    validation: ValidationState,
}

impl FormState {
    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    /// Clone of the current values.
    pub fn snapshot(&self) -> FormData {
        self.data.clone()
    }

    /// Store a new value for `field`, capped at the field's ceiling.
    ///
    /// Does not validate. A previously recorded error is dropped once the new
    /// value passes, so the annotation never lags behind a fix. Returns
    /// whether the input had to be truncated.
    pub fn update_field(&mut self, field: Field, value: &str) -> bool {
        let (value, truncated) = field::truncate(field, value);
        if truncated {
            debug!(%field, "input truncated to {} characters", field.max_len());
        }
        if self.validation.errors.contains_key(&field) && validator::validate(field, &value).is_ok()
        {
            self.validation.errors.remove(&field);
        }
        *self.data.slot_mut(field) = value;
        truncated
    }

    /// Mark `field` as touched and (re)validate it.
    pub fn handle_blur(&mut self, field: Field) {
        self.validation.touched.insert(field, true);
        self.revalidate(field);
    }

    /// Validate every field and mark all of them touched.
    ///
    /// This is the single gate a submission must pass: when it returns true
    /// the current `FormData` satisfies every rule.
    pub fn validate_all(&mut self) -> bool {
        for field in Field::all() {
            self.validation.touched.insert(field, true);
            self.revalidate(field);
        }
        let ok = self.validation.errors.is_empty();
        debug!(ok, invalid = self.validation.errors.len(), "validated whole form");
        ok
    }

    /// Back to all-empty values and untouched, error-free validation state.
    pub fn reset_form(&mut self) {
        self.data = FormData::default();
        self.validation = ValidationState::default();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        self.validation.visible_error(field)
    }

    pub fn has_visible_errors(&self) -> bool {
        Field::all().any(|f| self.visible_error(f).is_some())
    }

    /// Number of characters currently entered (the "N/1000" counter).
    pub fn char_count(&self, field: Field) -> usize {
        self.data.get(field).chars().count()
    }

    /// Characters left before the field's ceiling.
    pub fn remaining(&self, field: Field) -> usize {
        field.max_len().saturating_sub(self.char_count(field))
    }

    fn revalidate(&mut self, field: Field) {
        match validator::validate(field, self.data.get(field)) {
            Ok(()) => {
                self.validation.errors.remove(&field);
            }
            Err(err) => {
                self.validation.errors.insert(field, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> FormState {
        let mut state = FormState::default();
        state.update_field(Field::Name, "John Silva");
        state.update_field(Field::Email, "john@example.com");
        state.update_field(Field::Subject, "Quote request");
        state.update_field(Field::Message, "Hello there, testing.");
        state
    }

    #[test]
    fn update_does_not_validate() {
        let mut state = FormState::default();
        state.update_field(Field::Name, "J");
        assert!(state.validation().errors.is_empty());
        assert!(!state.validation().is_touched(Field::Name));
    }

    #[test]
    fn update_truncates_at_entry() {
        let mut state = FormState::default();
        let truncated = state.update_field(Field::Phone, "+55 (86) 99436-97631234");
        assert!(truncated);
        assert_eq!(state.char_count(Field::Phone), 15);
        assert_eq!(state.remaining(Field::Phone), 0);
    }

    #[test]
    fn blur_touches_and_records_error() {
        let mut state = FormState::default();
        state.update_field(Field::Name, "J");
        state.handle_blur(Field::Name);
        assert!(state.validation().is_touched(Field::Name));
        assert_eq!(
            state.visible_error(Field::Name),
            Some(&FieldError::TooShort { min: 2 })
        );
    }

    #[test]
    fn fixing_a_field_clears_its_error_without_blur() {
        let mut state = FormState::default();
        state.update_field(Field::Email, "nope");
        state.handle_blur(Field::Email);
        assert!(state.visible_error(Field::Email).is_some());

        state.update_field(Field::Email, "still@nope");
        assert!(state.visible_error(Field::Email).is_some());

        state.update_field(Field::Email, "yes@example.com");
        assert_eq!(state.visible_error(Field::Email), None);
    }

    #[test]
    fn untouched_error_is_not_visible() {
        let mut state = FormState::default();
        state.validation.errors.insert(Field::Subject, FieldError::Required);
        assert_eq!(state.visible_error(Field::Subject), None);
        assert!(!state.has_visible_errors());
    }

    #[test]
    fn validate_all_touches_everything_and_reports_each_invalid_field() {
        let mut state = FormState::default();
        state.update_field(Field::Name, "J");
        assert!(!state.validate_all());
        for field in Field::all() {
            assert!(state.validation().is_touched(field), "{field} not touched");
        }
        assert_eq!(
            state.visible_error(Field::Name),
            Some(&FieldError::TooShort { min: 2 })
        );
        assert_eq!(state.visible_error(Field::Email), Some(&FieldError::Required));
        assert_eq!(state.visible_error(Field::Phone), None);
        assert!(state.has_visible_errors());
        assert_eq!(state.visible_error(Field::Subject), Some(&FieldError::Required));
        assert_eq!(state.visible_error(Field::Message), Some(&FieldError::Required));
    }

    #[test]
    fn validate_all_passes_on_complete_form() {
        let mut state = filled();
        assert!(state.validate_all());
        for field in Field::all() {
            assert_eq!(validator::validate(field, state.data().get(field)), Ok(()));
        }
    }

    #[test]
    fn invalid_optional_phone_blocks_submission() {
        let mut state = filled();
        state.update_field(Field::Phone, "123");
        assert!(!state.validate_all());
        assert_eq!(state.visible_error(Field::Phone), Some(&FieldError::InvalidFormat));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = filled();
        state.validate_all();

        state.reset_form();
        let once = (state.data().clone(), state.validation().clone());
        state.reset_form();
        let twice = (state.data().clone(), state.validation().clone());

        assert_eq!(once, twice);
        assert!(state.is_empty());
        assert!(state.validation().is_clear());
    }

    #[test]
    fn phone_accessor_hides_blank_numbers() {
        let mut data = FormData::default();
        assert_eq!(data.phone(), None);
        data.phone = "  ".into();
        assert_eq!(data.phone(), None);
        data.phone = "(86) 99436-9763".into();
        assert_eq!(data.phone(), Some("(86) 99436-9763"));
    }
}
