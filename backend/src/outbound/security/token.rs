//! HS256 bearer tokens.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so tokens behave deterministically under a frozen clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CredentialError, TokenService};
use crate::domain::{IssuedToken, User, UserId};

/// Token lifetime used when none is configured.
pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Sign with `secret`; tokens expire `ttl_hours` after issue.
    pub fn new(secret: &[u8], ttl_hours: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours.max(1)),
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<IssuedToken, CredentialError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: user.id.get().to_string(),
            email: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|error| CredentialError::backend(error.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<UserId, CredentialError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|error| CredentialError::invalid_token(error.to_string()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| CredentialError::invalid_token("expiry out of range"))?;
        if expires_at <= self.clock.utc() {
            return Err(CredentialError::invalid_token("token expired"));
        }
        data.claims
            .sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| CredentialError::invalid_token("subject is not a user id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use rstest::rstest;

    struct StepClock(DateTime<Utc>);

    impl Clock for StepClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(hour: u32) -> Arc<dyn Clock> {
        let now = Utc
            .with_ymd_and_hms(2026, 4, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(StepClock(now))
    }

    fn member() -> User {
        let now = Utc
            .with_ymd_and_hms(2026, 4, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        User {
            id: UserId::new(42),
            name: "ada".into(),
            email: "ada@example.com".into(),
            picture: None,
            admin: false,
            password_digest: String::new(),
            activated: true,
            activated_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn issued_tokens_verify_until_expiry() {
        let issuer = JwtTokenService::new(b"secret", 2, at(8));
        let issued = issuer.issue(&member()).expect("token issued");

        assert_eq!(issued.expires_at.timestamp() - at(8).utc().timestamp(), 7_200);
        assert_eq!(issuer.verify(&issued.token).expect("valid"), UserId::new(42));

        let later = JwtTokenService::new(b"secret", 2, at(10));
        let error = later.verify(&issued.token).expect_err("expired");
        assert!(matches!(error, CredentialError::InvalidToken { .. }));
    }

    #[rstest]
    fn foreign_signatures_are_rejected() {
        let issued = JwtTokenService::new(b"one", 1, at(8))
            .issue(&member())
            .expect("token issued");

        let error = JwtTokenService::new(b"two", 1, at(8))
            .verify(&issued.token)
            .expect_err("bad signature");

        assert!(matches!(error, CredentialError::InvalidToken { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_an_invalid_token(#[case] token: &str) {
        let service = JwtTokenService::new(b"secret", 1, at(8));

        assert!(matches!(
            service.verify(token),
            Err(CredentialError::InvalidToken { .. })
        ));
    }
}
