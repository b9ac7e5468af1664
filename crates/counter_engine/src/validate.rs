use counter_logging::counter_debug;
use thiserror::Error;

use crate::normalize::normalize;

/// The `{max_length, count_markup}` pair shared by the display and the
/// submission check. A `max_length` of zero disables the limit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LengthLimit {
    pub max_length: usize,
    pub count_markup: bool,
}

impl LengthLimit {
    pub const fn new(max_length: usize, count_markup: bool) -> Self {
        Self {
            max_length,
            count_markup,
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.max_length > 0
    }
}

/// Outcome of measuring one submitted value against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub length: usize,
    pub max_length: usize,
}

impl Validation {
    pub fn passed(&self) -> bool {
        self.max_length == 0 || self.length <= self.max_length
    }

    pub fn remaining(&self) -> i64 {
        self.max_length as i64 - self.length as i64
    }

    /// Converts a failed check into a report naming the offending field.
    pub fn into_result(self, field_name: &str) -> Result<usize, LimitExceeded> {
        if self.passed() {
            Ok(self.length)
        } else {
            Err(LimitExceeded {
                name: field_name.to_string(),
                max: self.max_length,
                length: self.length,
            })
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{name} cannot be longer than {max} characters but is currently {length} characters long")]
pub struct LimitExceeded {
    pub name: String,
    pub max: usize,
    pub length: usize,
}

/// Measures `raw` exactly as the live counter does and compares it to `limit`.
pub fn validate_submission(raw: &str, limit: LengthLimit) -> Validation {
    Validation {
        length: normalize(raw, limit.count_markup),
        max_length: limit.max_length,
    }
}

/// A submitted field value. Text-with-summary fields carry a summary next to
/// the main value; only the main value is held to the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedValue {
    Text(String),
    WithSummary { value: String, summary: String },
}

impl SubmittedValue {
    pub fn limited_text(&self) -> &str {
        match self {
            SubmittedValue::Text(value) | SubmittedValue::WithSummary { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSubmission {
    pub name: String,
    pub value: SubmittedValue,
    pub limit: LengthLimit,
}

/// Validates every field of a submitted form, returning failures in field order.
pub fn validate_fields(fields: &[FieldSubmission]) -> Vec<LimitExceeded> {
    fields
        .iter()
        .filter(|field| field.limit.is_enabled())
        .filter_map(|field| {
            validate_submission(field.value.limited_text(), field.limit)
                .into_result(&field.name)
                .err()
        })
        .inspect(|failure| {
            counter_debug!(
                "Rejected field name={} length={} max={}",
                failure.name,
                failure.length,
                failure.max
            );
        })
        .collect()
}
