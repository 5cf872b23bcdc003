//! Checks a front end runs before handing input to the credential store.

use thiserror::Error;

/// Counted in UTF-16 code units, so one astral character such as an emoji
/// counts as two.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("All fields are required")]
    MissingRegistrationField,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please fill in all fields")]
    MissingLoginField,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Returns the first failing rule, checked in a fixed order.
    pub fn validate(&self) -> Result<(), FormError> {
        let fields = [
            &self.name,
            &self.email,
            &self.password,
            &self.confirm_password,
        ];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(FormError::MissingRegistrationField);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if !self.email.contains('@') {
            return Err(FormError::InvalidEmail);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingLoginField);
        }
        Ok(())
    }
}
