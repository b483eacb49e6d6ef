//! Shared error taxonomy for every ledger operation.
//!
//! Each failure is classified exactly once, where it happens, into one of
//! four kinds. The transport layer pattern-matches on [`ErrorKind`] to pick a
//! status code; nothing downstream re-inspects the message.

use serde::Serialize;

/// Caller-visible outcome class of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Invalid,
    /// A referenced master, stock row, lend or disposal does not exist.
    NotFound,
    /// A business rule was violated (insufficient stock, over-return,
    /// duplicate identifier).
    Conflict,
    /// Unexpected storage failure.
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Invalid => "Invalid",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by any displayable id.
    pub fn not_found(entity: &'static str, key: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Validation(_) => ErrorKind::Invalid,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message without the kind prefix, suitable for an error envelope.
    pub fn message(&self) -> String {
        match self {
            CoreError::NotFound { entity, key } => format!("{entity} {key} not found"),
            CoreError::Validation(msg) | CoreError::Conflict(msg) | CoreError::Internal(msg) => {
                msg.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(CoreError::not_found("Lend", "x").kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::Validation("v".into()).kind(), ErrorKind::Invalid);
        assert_eq!(CoreError::Conflict("c".into()).kind(), ErrorKind::Conflict);
        assert_eq!(CoreError::Internal("i".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn message_strips_kind_prefix() {
        let err = CoreError::Conflict("insufficient stock".into());
        assert_eq!(err.to_string(), "Conflict: insufficient stock");
        assert_eq!(err.message(), "insufficient stock");
    }

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = CoreError::not_found("Asset master", "EMB-20250115-0042");
        assert_eq!(err.message(), "Asset master EMB-20250115-0042 not found");
    }

    #[test]
    fn kind_serializes_as_code() {
        assert_eq!(
            serde_json::to_value(ErrorKind::NotFound).unwrap(),
            serde_json::json!("NotFound")
        );
        assert_eq!(ErrorKind::Invalid.to_string(), "Invalid");
    }
}
