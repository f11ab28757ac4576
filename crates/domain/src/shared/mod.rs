pub mod entity;

use thiserror::Error;

/// Returned when a stored or client provided string does not name
/// a known variant of one of the domain enums.
#[derive(Error, Debug, PartialEq)]
#[error("`{value}` is not a valid {kind}")]
pub struct InvalidVariantError {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidVariantError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
