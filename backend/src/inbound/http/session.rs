//! Bearer-token session extraction.
//!
//! [`SessionContext`] reads `Authorization: Bearer <jwt>` and verifies it
//! through the [`TokenService`](crate::domain::ports::TokenService) held in
//! [`HttpState`]. Extraction never fails on a bad token: handlers decide
//! whether authentication is required (`require_user_id`) or optional
//! (`viewer`).

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bearer {
    Missing,
    Valid(UserId),
    Invalid,
}

/// Authentication outcome for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext(Bearer);

impl SessionContext {
    /// Context for an authenticated user; used by tests and internal callers.
    pub fn authenticated(user_id: UserId) -> Self {
        Self(Bearer::Valid(user_id))
    }

    pub fn anonymous() -> Self {
        Self(Bearer::Missing)
    }

    /// Verified user id, treating invalid tokens as anonymous.
    pub fn viewer(&self) -> Option<UserId> {
        match self.0 {
            Bearer::Valid(id) => Some(id),
            Bearer::Missing | Bearer::Invalid => None,
        }
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        match self.0 {
            Bearer::Valid(id) => Ok(id),
            Bearer::Missing => Err(Error::unauthorized("authorization header required")),
            Bearer::Invalid => Err(Error::unauthorized("invalid or expired token")),
        }
    }

    fn from_header(state: &HttpState, header: Option<&str>) -> Self {
        let Some(raw) = header else {
            return Self::anonymous();
        };
        let token = match raw.get(..BEARER_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
                raw[BEARER_PREFIX.len()..].trim()
            }
            _ => return Self(Bearer::Invalid),
        };
        match state.tokens.verify(token) {
            Ok(id) => Self(Bearer::Valid(id)),
            Err(error) => {
                debug!(%error, "bearer token rejected");
                Self(Bearer::Invalid)
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("HTTP state is not configured").into()));
        };
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(Ok(Self::from_header(state, header)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CredentialError, MockTokenService};
    use crate::inbound::http::test_utils::state_with_tokens;
    use rstest::rstest;
    use std::sync::Arc;

    fn state() -> HttpState {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().returning(|token| match token {
            "good" => Ok(UserId::new(7)),
            _ => Err(CredentialError::invalid_token("bad signature")),
        });
        state_with_tokens(Arc::new(tokens))
    }

    #[rstest]
    #[case(Some("Bearer good"), Some(UserId::new(7)))]
    #[case(Some("bearer   good"), Some(UserId::new(7)))]
    #[case(Some("Bearer forged"), None)]
    #[case(Some("Basic Z29vZA=="), None)]
    #[case(None, None)]
    fn viewer_is_only_set_for_valid_tokens(
        #[case] header: Option<&str>,
        #[case] expected: Option<UserId>,
    ) {
        let context = SessionContext::from_header(&state(), header);
        assert_eq!(context.viewer(), expected);
    }

    #[rstest]
    #[case(None, "authorization header required")]
    #[case(Some("Bearer forged"), "invalid or expired token")]
    fn required_sessions_explain_rejections(
        #[case] header: Option<&str>,
        #[case] message: &str,
    ) {
        let error = SessionContext::from_header(&state(), header)
            .require_user_id()
            .expect_err("unauthenticated");

        assert_eq!(error.code(), crate::domain::ErrorCode::Unauthorized);
        assert_eq!(error.message(), message);
    }
}
