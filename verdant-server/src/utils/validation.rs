//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! at the handler boundary.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Usernames and display names
pub const MAX_NAME_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Notes, reasons (rejection reason, pickup note)
pub const MAX_NOTE_LEN: usize = 500;

/// Re-entry verification code digit bounds
pub const MIN_REENTRY_CODE_LEN: usize = 4;
pub const MAX_REENTRY_CODE_LEN: usize = 8;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal email shape check: one `@` with non-empty local part and a
/// domain containing a dot. Deliverability is not our problem.
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let Some((local, domain)) = value.split_once('@') else {
        return Err(AppError::validation(format!("{field} is not a valid email")));
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') {
        return Err(AppError::validation(format!("{field} is not a valid email")));
    }
    Ok(())
}

/// Validate the numeric re-entry code: 4-8 characters, digits only.
pub fn validate_reentry_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_REENTRY_CODE_LEN || code.len() > MAX_REENTRY_CODE_LEN {
        return Err(AppError::validation(format!(
            "re-entry code must be {MIN_REENTRY_CODE_LEN}-{MAX_REENTRY_CODE_LEN} digits"
        )));
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "re-entry code must contain digits only",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_code_bounds() {
        assert!(validate_reentry_code("1234").is_ok());
        assert!(validate_reentry_code("12345678").is_ok());
        assert!(validate_reentry_code("123").is_err());
        assert!(validate_reentry_code("123456789").is_err());
        assert!(validate_reentry_code("12a4").is_err());
        assert!(validate_reentry_code("12 4").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("a@b.co", "email").is_ok());
        assert!(validate_email("no-at-sign", "email").is_err());
        assert!(validate_email("@b.co", "email").is_err());
        assert!(validate_email("a@nodot", "email").is_err());
    }
}
