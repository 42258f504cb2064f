//! Git errors

use super::PacfallError;

/// Creates a clone failed error
pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> PacfallError {
    PacfallError::GitCloneFailed {
        url: url.into(),
        reason: reason.into(),
    }
}
