//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockImageStore, MockPasswordHasher, MockTokenService, MockUserRepository, RepositoryError,
};
use crate::domain::test_fixtures::{FixtureClock, fixed_time, user};
use crate::domain::{EmailAddress, ErrorCode, IssuedToken, UserName};

struct Doubles {
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
    images: MockImageStore,
}

impl Doubles {
    fn build(self) -> AccountServiceImpl {
        AccountServiceImpl::new(AccountDependencies {
            users: Arc::new(self.users),
            hasher: Arc::new(self.hasher),
            tokens: Arc::new(self.tokens),
            images: Arc::new(self.images),
            clock: Arc::new(FixtureClock),
        })
    }
}

#[fixture]
fn doubles() -> Doubles {
    let mut tokens = MockTokenService::new();
    tokens.expect_issue().returning(|user| {
        Ok(IssuedToken {
            token: format!("token-{}", user.id),
            expires_at: fixed_time(),
        })
    });
    Doubles {
        users: MockUserRepository::new(),
        hasher: MockPasswordHasher::new(),
        tokens,
        images: MockImageStore::new(),
    }
}

fn registration() -> Registration {
    Registration::try_new("Aiko", "aiko@example.com", "secret1").expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn signup_rejects_taken_email(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(user(1))));
    doubles.users.expect_create().times(0);

    let error = doubles
        .build()
        .signup(&registration())
        .await
        .expect_err("email taken");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn signup_stores_digest_and_activates(mut doubles: Doubles) {
    doubles.users.expect_find_by_email().return_once(|_| Ok(None));
    doubles
        .hasher
        .expect_hash()
        .withf(|password| password == "secret1")
        .return_once(|_| Ok("pbkdf2_sha256$1$salt$hash".into()));
    doubles
        .users
        .expect_create()
        .withf(|new_user| {
            new_user.password_digest == "pbkdf2_sha256$1$salt$hash"
                && new_user.activated_at == Some(fixed_time())
                && new_user.email.as_str() == "aiko@example.com"
        })
        .return_once(|_| Ok(user(5)));

    let session = doubles
        .build()
        .signup(&registration())
        .await
        .expect("signup succeeds");
    assert_eq!(session.user.id, UserId::new(5));
    assert_eq!(session.token.token, "token-5");
}

#[rstest]
#[tokio::test]
async fn signup_maps_lost_race_to_conflict(mut doubles: Doubles) {
    doubles.users.expect_find_by_email().return_once(|_| Ok(None));
    doubles
        .hasher
        .expect_hash()
        .return_once(|_| Ok("digest".into()));
    doubles
        .users
        .expect_create()
        .return_once(|_| Err(RepositoryError::duplicate("users_email_key")));

    let error = doubles
        .build()
        .signup(&registration())
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "email already registered");
}

#[rstest]
#[case(None, true, true, ErrorCode::Unauthorized)]
#[case(Some(true), false, true, ErrorCode::Unauthorized)]
#[case(Some(true), true, false, ErrorCode::Forbidden)]
#[tokio::test]
async fn login_failures(
    mut doubles: Doubles,
    #[case] exists: Option<bool>,
    #[case] password_ok: bool,
    #[case] activated: bool,
    #[case] expected: ErrorCode,
) {
    let mut stored = user(3);
    stored.activated = activated;
    let found = exists.map(|_| stored);
    doubles
        .users
        .expect_find_by_email()
        .return_once(move |_| Ok(found));
    doubles
        .hasher
        .expect_verify()
        .returning(move |_, _| password_ok);

    let creds = LoginCredentials::new("user3@example.com", "whatever");
    let error = doubles.build().login(&creds).await.expect_err("login fails");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn login_issues_token(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_email()
        .withf(|email| email == "user3@example.com")
        .return_once(|_| Ok(Some(user(3))));
    doubles.hasher.expect_verify().return_const(true);

    let creds = LoginCredentials::new("USER3@example.com", "secret1");
    let session = doubles.build().login(&creds).await.expect("login succeeds");
    assert_eq!(session.token.token, "token-3");
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_service_unavailable(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_id()
        .return_once(|_| Err(RepositoryError::connection("pool timeout")));

    let error = doubles
        .build()
        .get_user(UserId::new(1))
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(false, ErrorCode::Forbidden)]
#[tokio::test]
async fn non_admins_cannot_manage_others(
    mut doubles: Doubles,
    #[case] admin: bool,
    #[case] expected: ErrorCode,
) {
    doubles.users.expect_find_by_id().returning(move |id| {
        let mut found = user(id.get());
        found.admin = admin && id == UserId::new(1);
        Ok(Some(found))
    });
    doubles.users.expect_delete().times(0);

    let error = doubles
        .build()
        .delete_user(UserId::new(1), UserId::new(2))
        .await
        .expect_err("not allowed");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn admins_can_update_other_accounts(mut doubles: Doubles) {
    doubles.users.expect_find_by_id().returning(|id| {
        let mut found = user(id.get());
        found.admin = id == UserId::new(1);
        Ok(Some(found))
    });
    doubles
        .users
        .expect_update_profile()
        .withf(|id, update| *id == UserId::new(2) && update.name.is_some())
        .return_once(|_, _| Ok(Some(user(2))));

    let update = UserUpdate {
        name: Some(UserName::new("Renamed").expect("valid name")),
        ..UserUpdate::default()
    };
    let updated = doubles
        .build()
        .update_user(UserId::new(1), UserId::new(2), update)
        .await
        .expect("admin may update");
    assert_eq!(updated.id, UserId::new(2));
}

#[rstest]
#[tokio::test]
async fn profile_update_rejects_email_of_another_user(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1))));
    doubles
        .users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(user(9))));
    doubles.users.expect_update_profile().times(0);

    let update = UserUpdate {
        email: Some(EmailAddress::new("user9@example.com").expect("valid email")),
        ..UserUpdate::default()
    };
    let error = doubles
        .build()
        .update_profile(UserId::new(1), update, None)
        .await
        .expect_err("email taken");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn change_password_requires_current_password(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1))));
    doubles.hasher.expect_verify().return_const(false);
    doubles.users.expect_update_password().times(0);

    let change = PasswordChange::try_new("wrong", "newsecret").expect("valid change");
    let error = doubles
        .build()
        .change_password(UserId::new(1), &change)
        .await
        .expect_err("wrong current password");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "current password is incorrect");
}

#[rstest]
#[tokio::test]
async fn change_password_stores_new_digest(mut doubles: Doubles) {
    doubles
        .users
        .expect_find_by_id()
        .return_once(|_| Ok(Some(user(1))));
    doubles.hasher.expect_verify().return_const(true);
    doubles
        .hasher
        .expect_hash()
        .return_once(|_| Ok("fresh".into()));
    doubles
        .users
        .expect_update_password()
        .withf(|id, digest| *id == UserId::new(1) && digest == "fresh")
        .return_once(|_, _| Ok(true));

    let change = PasswordChange::try_new("secret1", "newsecret").expect("valid change");
    doubles
        .build()
        .change_password(UserId::new(1), &change)
        .await
        .expect("password changed");
}
