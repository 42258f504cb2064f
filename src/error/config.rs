//! Configuration errors

use super::PacfallError;

/// Creates a configuration not found error
pub fn not_found(path: impl Into<String>) -> PacfallError {
    PacfallError::ConfigNotFound { path: path.into() }
}

/// Creates a configuration parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> PacfallError {
    PacfallError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid configuration error
pub fn invalid(message: impl Into<String>) -> PacfallError {
    PacfallError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a configuration read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> PacfallError {
    PacfallError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a package list read error
pub fn package_list_failed(path: impl Into<String>, reason: impl Into<String>) -> PacfallError {
    PacfallError::PackageListReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
