//! Counter engine: length normalization and authoritative limit validation.
mod normalize;
mod strip;
mod validate;

pub use normalize::{normalize, LengthNormalizer};
pub use strip::strip_markup;
pub use validate::{
    validate_fields, validate_submission, FieldSubmission, LengthLimit, LimitExceeded,
    SubmittedValue, Validation,
};
