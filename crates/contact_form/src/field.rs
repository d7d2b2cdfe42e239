//! Field catalogue of the contact form.
//!
//! Declarative, data-only description of the five inputs: their keys,
//! labels and length limits. Validation rules live in `validator.rs`,
//! mutable editing state in `state.rs`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// A single named input of the contact form.
///
/// Iteration order (`Field::iter()`) is the order the form presents them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

impl Field {
    /// All fields in form order.
    pub fn all() -> impl Iterator<Item = Field> {
        Field::iter()
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }

    /// Input ceiling in characters. Longer input is cut at the point of entry.
    pub fn max_len(self) -> usize {
        match self {
            Field::Name => 100,
            Field::Email => 255,
            Field::Phone => 15,
            Field::Subject => 100,
            Field::Message => 1000,
        }
    }

    /// Minimum trimmed length, for the fields that have one.
    pub fn min_len(self) -> Option<usize> {
        match self {
            Field::Name => Some(2),
            Field::Subject => Some(3),
            Field::Message => Some(10),
            Field::Email | Field::Phone => None,
        }
    }

    /// Phone is the only optional field.
    pub fn is_required(self) -> bool {
        !matches!(self, Field::Phone)
    }
}

/// Cap `value` at the field's ceiling, counting characters rather than bytes.
///
/// Returns the (possibly shortened) value and whether anything was cut.
pub fn truncate(field: Field, value: &str) -> (String, bool) {
    let max = field.max_len();
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => (value[..byte_idx].to_string(), true),
        None => (value.to_string(), false),
    }
}
