//! Email address used as the session identity and ownership key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserEmail::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserEmailValidationError {
    #[error("email must not be empty")]
    Empty,
}

/// A trimmed, non-empty email address.
///
/// No format check is applied; the value is compared for equality only.
///
/// # Examples
/// ```
/// use rfood::domain::UserEmail;
///
/// let email = UserEmail::new("  donor@example.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "donor@example.com");
/// assert!(UserEmail::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserEmail(String);

impl UserEmail {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserEmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserEmailValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserEmail {
    type Error = UserEmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserEmail> for String {
    fn from(value: UserEmail) -> Self {
        value.0
    }
}
