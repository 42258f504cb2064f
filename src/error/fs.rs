//! File system errors

use super::PacfallError;

/// Creates a file write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> PacfallError {
    PacfallError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
