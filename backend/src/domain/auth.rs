//! Authentication primitives: credentials and issued tokens.
//!
//! Handlers build these from request payloads so the services only ever see
//! validated input. Passwords are wrapped in [`Zeroizing`] and wiped on drop.

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{EmailAddress, User, UserName, UserValidationError, validate_password};

/// Login payload.
///
/// The e-mail is only normalised, not validated: an unknown or malformed
/// address is reported the same way as a wrong password.
///
/// # Examples
/// ```
/// use speadwear::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new(" Ada@Example.com ", "secret");
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate name, e-mail and password together.
    pub fn try_new(name: &str, email: &str, password: &str) -> Result<Self, UserValidationError> {
        let name = UserName::new(name)?;
        let email = EmailAddress::new(email)?;
        validate_password(password)?;
        Ok(Self {
            name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Password change request. The new password is length-checked on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    replacement: Zeroizing<String>,
}

impl PasswordChange {
    pub fn try_new(current: &str, replacement: &str) -> Result<Self, UserValidationError> {
        validate_password(replacement)?;
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            replacement: Zeroizing::new(replacement.to_owned()),
        })
    }

    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    pub fn replacement(&self) -> &str {
        self.replacement.as_str()
    }
}

/// Signed bearer token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of signup, login and refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: User,
}
