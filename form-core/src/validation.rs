//! Per-field feedback rules and live input shaping.

use crate::error::{FormError, Result};
use crate::profile::InputLimits;

/// Visual state of a required field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldMark {
    /// Never validated yet.
    #[default]
    Neutral,
    Valid,
    Invalid,
}

impl FieldMark {
    /// Border colour applied to the field, if any.
    pub fn border_color(&self) -> Option<&'static str> {
        match self {
            FieldMark::Neutral => None,
            FieldMark::Valid => "#10b981".into(),
            FieldMark::Invalid => "#dc2626".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldEvent {
    /// The field lost focus.
    Blur,
    /// The value changed by typing or pasting.
    Input,
}

/// Next mark for a required field after `event`, given its current value.
///
/// Losing focus marks the field invalid when blank and valid otherwise.
/// Typing can only promote a field to valid; it never marks it invalid.
pub fn next_mark(current: FieldMark, event: FieldEvent, value: &str) -> FieldMark {
    let filled = !value.trim().is_empty();
    match event {
        FieldEvent::Blur if filled => FieldMark::Valid,
        FieldEvent::Blur => FieldMark::Invalid,
        FieldEvent::Input if filled => FieldMark::Valid,
        FieldEvent::Input => current,
    }
}

/// Fields whose value is reshaped on every input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitField {
    Phone,
    Pincode,
}

impl DigitField {
    pub fn element_id(&self) -> &'static str {
        match self {
            DigitField::Phone => "phone",
            DigitField::Pincode => "pincode",
        }
    }

    pub fn max_digits(&self, limits: &InputLimits) -> usize {
        match self {
            DigitField::Phone => limits.phone_digits,
            DigitField::Pincode => limits.pincode_digits,
        }
    }
}

/// Strip every non-digit and truncate to `max` digits.
pub fn filter_digits(value: &str, max: usize) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).take(max).collect()
}

/// Check a selected photo file against the upload rules.
///
/// Size is checked before type.
pub fn check_photo_file(size: u64, mime: &str, limits: &InputLimits) -> Result<()> {
    if size > limits.max_photo_bytes {
        return Err(FormError::PhotoTooLarge {
            size,
            limit: limits.max_photo_bytes,
        });
    }
    if !mime.contains("image") {
        return Err(FormError::NotAnImage(mime.to_string()));
    }
    Ok(())
}
