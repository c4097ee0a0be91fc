use std::cmp::Ordering;

use crate::error::ApiError;

/// Parses `1.2.3` (optionally `v1.2.3`) into its numeric components
pub fn parse_version(version: &str) -> Result<Vec<u64>, ApiError> {
    let trimmed = version.trim();
    let digits = trimmed
        .strip_prefix(['v', 'V'])
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(ApiError::MalformedVersion(version.to_string()));
    }

    digits
        .split('.')
        .map(|component| {
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ApiError::MalformedVersion(version.to_string()));
            }
            component
                .parse()
                .map_err(|_| ApiError::MalformedVersion(version.to_string()))
        })
        .collect()
}

/// Compares component-wise, treating missing trailing components as 0
///
/// `Greater` means `a` is newer than `b`.
pub fn compare_versions(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
