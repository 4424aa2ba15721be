//! Ports for password digests and bearer tokens.

use async_trait::async_trait;

use crate::domain::{IssuedToken, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential adapters.
    pub enum CredentialError {
        /// Hashing or signing failed for reasons unrelated to the input.
        Backend { message: String } => "credential backend failed: {message}",
        /// The presented token is malformed, forged or expired.
        InvalidToken { message: String } => "invalid token: {message}",
    }
}

/// One-way password digests.
///
/// Key stretching is CPU-bound, so implementations must keep it off the
/// async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest suitable for storage.
    async fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Check `password` against a stored digest. Malformed digests verify as
    /// `false`.
    async fn verify(&self, password: &str, digest: &str) -> bool;
}

/// Signed bearer tokens identifying a user.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> Result<IssuedToken, CredentialError>;

    /// Validate signature and expiry and return the subject.
    fn verify(&self, token: &str) -> Result<UserId, CredentialError>;
}
