//! Request validation
//!
//! Package names end up as arguments to pacman and the AUR helper, so
//! anything that could be read as an option is rejected up front.

use crate::error::{PacfallError, Result};

/// Whether `name` is a well-formed Arch package name.
///
/// Allowed: lowercase alphanumerics and `@ . _ + -`, not starting with a
/// hyphen or a dot.
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.starts_with('.')
        && name.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '@' | '.' | '_' | '+' | '-')
        })
}

/// Trim names, drop empty ones and reject malformed ones
///
/// # Errors
///
/// Returns `PacfallError::InvalidPackageName` for the first malformed name.
pub fn normalize_requests<I, S>(names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut requests = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if !is_valid_package_name(name) {
            return Err(PacfallError::InvalidPackageName {
                name: name.to_string(),
            });
        }
        requests.push(name.to_string());
    }
    Ok(requests)
}
