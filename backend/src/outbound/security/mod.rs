//! Credential adapters: password digests and signed bearer tokens.

mod password;
mod token;

pub use password::{DEFAULT_ITERATIONS, Pbkdf2PasswordHasher};
pub use token::{DEFAULT_TTL_HOURS, JwtTokenService};
