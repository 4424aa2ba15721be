//! PBKDF2-HMAC-SHA256 password digests.
//!
//! Digests are stored as `pbkdf2_sha256$<iterations>$<salt>$<hash>` with a
//! hex salt and a base64 hash, so the iteration count can be raised later
//! without invalidating existing rows.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::Sha256;
use tokio::task;
use tracing::error;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialError, PasswordHasher};

const SCHEME: &str = "pbkdf2_sha256";
const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = 32;

/// Iterations applied to new digests.
pub const DEFAULT_ITERATIONS: u32 = 600_000;

#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2PasswordHasher {
    iterations: u32,
}

impl Default for Pbkdf2PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl Pbkdf2PasswordHasher {
    /// Hasher applying `iterations` rounds; zero is raised to one.
    pub const fn new(iterations: u32) -> Self {
        Self {
            iterations: if iterations == 0 { 1 } else { iterations },
        }
    }

    pub const fn iterations(&self) -> u32 {
        self.iterations
    }
}

fn derive(password: &str, salt: &str, iterations: u32) -> String {
    let mut output = [0_u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut output);
    STANDARD.encode(output)
}

fn hash_blocking(password: &str, iterations: u32) -> Result<String, CredentialError> {
    let mut salt = [0_u8; SALT_BYTES];
    rand::thread_rng()
        .try_fill_bytes(&mut salt)
        .map_err(|error| CredentialError::backend(error.to_string()))?;
    let salt = hex::encode(salt);
    let hash = derive(password, &salt, iterations);
    Ok(format!("{SCHEME}${iterations}${salt}${hash}"))
}

fn verify_blocking(password: &str, digest: &str) -> bool {
    let mut parts = digest.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let computed = derive(password, salt, iterations);
    constant_time_eq(computed.as_bytes(), expected.as_bytes())
}

#[async_trait]
impl PasswordHasher for Pbkdf2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let password = Zeroizing::new(password.to_owned());
        let iterations = self.iterations;
        task::spawn_blocking(move || hash_blocking(&password, iterations))
            .await
            .map_err(|error| CredentialError::backend(error.to_string()))?
    }

    async fn verify(&self, password: &str, digest: &str) -> bool {
        let password = Zeroizing::new(password.to_owned());
        let digest = digest.to_owned();
        match task::spawn_blocking(move || verify_blocking(&password, &digest)).await {
            Ok(matches) => matches,
            Err(error) => {
                error!(%error, "password verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Pbkdf2PasswordHasher {
        Pbkdf2PasswordHasher::new(1_000)
    }

    #[rstest]
    #[tokio::test]
    async fn digests_verify_the_original_password(hasher: Pbkdf2PasswordHasher) {
        let digest = hasher.hash("hunter22").await.expect("hash succeeds");

        assert!(digest.starts_with("pbkdf2_sha256$1000$"));
        assert!(hasher.verify("hunter22", &digest).await);
        assert!(!hasher.verify("hunter23", &digest).await);
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_digests(hasher: Pbkdf2PasswordHasher) {
        let first = hasher.hash("same").await.expect("hash succeeds");
        let second = hasher.hash("same").await.expect("hash succeeds");

        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn digests_keep_their_own_iteration_count(hasher: Pbkdf2PasswordHasher) {
        let digest = hasher.hash("rotate-me").await.expect("hash succeeds");

        assert!(Pbkdf2PasswordHasher::new(5).verify("rotate-me", &digest).await);
    }

    // On a single-threaded runtime the spawned task can only finish if the
    // digest is computed elsewhere while the caller is parked.
    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_executor_free() {
        let hasher = Pbkdf2PasswordHasher::new(20_000);
        let ticker = tokio::spawn(async {});
        let digest = hasher.hash("patience").await.expect("hash succeeds");

        assert!(ticker.is_finished());
        assert!(hasher.verify("patience", &digest).await);
    }

    #[rstest]
    #[case("")]
    #[case("plain")]
    #[case("bcrypt$10$salt$hash")]
    #[case("pbkdf2_sha256$many$salt$hash")]
    #[case("pbkdf2_sha256$0$salt$hash")]
    #[case("pbkdf2_sha256$10$salt$hash$extra")]
    #[tokio::test]
    async fn malformed_digests_never_verify(hasher: Pbkdf2PasswordHasher, #[case] digest: &str) {
        assert!(!hasher.verify("anything", digest).await);
    }

    #[rstest]
    fn zero_iterations_are_raised() {
        assert_eq!(Pbkdf2PasswordHasher::new(0).iterations(), 1);
    }
}
