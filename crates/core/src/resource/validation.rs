//! Pure field validation helpers.
//!
//! These functions check a single field and report failures as
//! [`FieldError`]s; payload types compose them into a full validation pass.

use super::error::FieldError;

/// Checks that a required text field is present and not blank.
///
/// # Examples
///
/// ```
/// use taskstash_core::resource::check_required;
///
/// assert!(check_required("title", "write spec").is_none());
/// assert!(check_required("title", "   ").is_some());
/// ```
pub fn check_required(field: &'static str, value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        Some(FieldError::new(field, "This field may not be blank."))
    } else {
        None
    }
}

/// Checks that a text field does not exceed `max` characters.
///
/// Length is counted in characters, not bytes, so multi-byte input is not
/// penalized.
///
/// # Examples
///
/// ```
/// use taskstash_core::resource::check_max_len;
///
/// assert!(check_max_len("title", "short", 200).is_none());
/// assert!(check_max_len("title", &"x".repeat(201), 200).is_some());
/// ```
pub fn check_max_len(field: &'static str, value: &str, max: usize) -> Option<FieldError> {
    if value.chars().count() > max {
        Some(FieldError::new(
            field,
            format!("Ensure this field has no more than {max} characters."),
        ))
    } else {
        None
    }
}
