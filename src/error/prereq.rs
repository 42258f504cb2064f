//! Prerequisite errors

use super::PacfallError;

/// Creates a missing privilege wrapper error
pub fn privilege_wrapper_missing(wrapper: impl Into<String>) -> PacfallError {
    PacfallError::PrivilegeWrapperMissing {
        wrapper: wrapper.into(),
    }
}

/// Creates a helper bootstrap error
pub fn helper_bootstrap_failed(
    helper: impl Into<String>,
    reason: impl Into<String>,
) -> PacfallError {
    PacfallError::HelperBootstrapFailed {
        helper: helper.into(),
        reason: reason.into(),
    }
}
