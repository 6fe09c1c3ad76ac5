use thiserror::Error;

/// Rejections raised before anything is sent to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("price must be greater than zero")]
    NonPositivePrice,

    #[error("rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),

    #[error("\"{0}\" is not a bookable time slot")]
    UnknownTimeSlot(String),

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
}

/// Returns the trimmed value, or [`ValidationError::MissingField`] when blank.
pub(crate) fn required<'a>(
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}
