//! Engine error types.

use thiserror::Error;

/// Errors reported when submitting geometry to the engine.
///
/// A rejected submission leaves the engine untouched: no canonical shape
/// is registered and no counter moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstancingError {
    /// The per-instance attribute does not fit the packed `u8` slot.
    #[error("instance attribute {0} out of range (expected 0..=255)")]
    AttributeOutOfRange(u32),
    /// The submitted mesh cannot be instanced.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

pub type InstancingResult<T> = Result<T, InstancingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InstancingError::AttributeOutOfRange(300);
        assert_eq!(
            err.to_string(),
            "instance attribute 300 out of range (expected 0..=255)"
        );

        let err = InstancingError::InvalidMesh("index out of bounds".to_string());
        assert_eq!(err.to_string(), "invalid mesh: index out of bounds");
    }
}
