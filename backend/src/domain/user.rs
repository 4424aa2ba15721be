//! User accounts and their validated profile fields.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use super::UserId;

/// Minimum accepted length, in characters, for a user name.
pub const USER_NAME_MIN: usize = 2;
/// Maximum accepted length, in characters, for a user name.
pub const USER_NAME_MAX: usize = 255;
/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;

/// Validation failures for account fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

/// Display name shown on profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a user name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if !(USER_NAME_MIN..=USER_NAME_MAX).contains(&length) {
            return Err(UserValidationError::NameLength {
                min: USER_NAME_MIN,
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Syntactically valid, lower-cased e-mail address.
///
/// # Examples
/// ```
/// use speadwear::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Alice@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "alice@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let valid = normalised.chars().count() <= USER_NAME_MAX
            && email_regex().is_some_and(|re| re.is_match(&normalised));
        if !valid {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enforce the minimum password length.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    Ok(())
}

/// Stored account.
///
/// `password_digest` never leaves the domain: HTTP responses are built from
/// the public fields only.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub admin: bool,
    pub password_digest: String,
    pub activated: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `requester` may modify or delete this account.
    pub fn can_be_managed_by(&self, requester: &User) -> bool {
        requester.id == self.id || requester.admin
    }
}

/// Account to insert on signup.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: UserName,
    pub email: EmailAddress,
    pub password_digest: String,
    pub activated_at: Option<DateTime<Utc>>,
}

/// Profile fields a user may change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
    pub picture: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.picture.is_none()
    }
}

#[cfg(test)]
mod tests;
