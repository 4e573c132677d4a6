// Validation utilities for request fields

use super::scan_errors::ScanError;

/// Trim the submitted URL, rejecting a missing or blank value
///
/// # Returns
/// * `Ok(String)` - The trimmed URL
/// * `Err(ScanError::EmptyUrl)` - If nothing usable was submitted
pub fn require_url(field: Option<&str>) -> Result<String, ScanError> {
    let trimmed = field.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        Err(ScanError::EmptyUrl)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Lowercased optional text field, empty when missing
pub fn lowercase_or_empty(field: Option<&str>) -> String {
    field.map(str::to_lowercase).unwrap_or_default()
}
