//! Pure field validation for the wizard steps. No I/O: every rule is a
//! synchronous check returning the first human-readable failure.

use email_address::EmailAddress;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Add at least one skill")]
    NoSkills,

    #[error("{0} must be a PDF document")]
    NotAPdf(&'static str),
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reject blank values, naming the offending field in the message.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EmailAddress::is_valid(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_passwords_match(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Drop blank entries, trimming the survivors. Order is preserved.
pub fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
