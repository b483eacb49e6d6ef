//! Input checks shared by the engines. Each returns
//! [`CoreError::Validation`] naming the offending field.

use crate::error::CoreError;
use crate::types::Quantity;

/// Reject empty or whitespace-only required text.
pub fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Same as [`require_text`] for optional patches: `None` passes.
pub fn reject_blank(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

pub fn require_positive(field: &str, value: Quantity) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::Validation(format!("{field} must be > 0")));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: Quantity) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!("{field} must be >= 0")));
    }
    Ok(())
}

/// Trim optional free text, mapping blank to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
