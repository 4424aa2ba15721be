//! Validation coverage for account fields.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};

#[fixture]
fn member() -> User {
    let at = Utc
        .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
        .single()
        .expect("valid timestamp");
    User {
        id: UserId::new(1),
        name: "Aiko".into(),
        email: "aiko@example.com".into(),
        picture: None,
        admin: false,
        password_digest: "digest".into(),
        activated: true,
        activated_at: Some(at),
        created_at: at,
        updated_at: at,
    }
}

#[rstest]
#[case("a")]
#[case("   b   ")]
#[case("")]
fn short_names_are_rejected(#[case] raw: &str) {
    assert_eq!(
        UserName::new(raw),
        Err(UserValidationError::NameLength {
            min: USER_NAME_MIN,
            max: USER_NAME_MAX
        })
    );
}

#[rstest]
fn long_names_are_rejected() {
    let raw = "x".repeat(USER_NAME_MAX + 1);
    assert!(UserName::new(raw).is_err());
}

#[rstest]
fn names_are_trimmed() {
    let name = UserName::new("  Ren  ").expect("valid name");
    assert_eq!(name.as_str(), "Ren");
}

#[rstest]
#[case("plain")]
#[case("two@@example.com")]
#[case("spaces in@example.com")]
#[case("missing@tld")]
fn malformed_emails_are_rejected(#[case] raw: &str) {
    assert_eq!(EmailAddress::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
#[case("12345", false)]
#[case("123456", true)]
fn password_length_is_enforced(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(validate_password(raw).is_ok(), ok);
}

#[rstest]
fn owners_and_admins_manage_accounts(member: User) {
    let mut stranger = member.clone();
    stranger.id = UserId::new(2);
    assert!(member.can_be_managed_by(&member));
    assert!(!member.can_be_managed_by(&stranger));

    stranger.admin = true;
    assert!(member.can_be_managed_by(&stranger));
}

#[rstest]
fn empty_update_is_detected() {
    assert!(UserUpdate::default().is_empty());
    let update = UserUpdate {
        picture: Some("users/1.png".into()),
        ..UserUpdate::default()
    };
    assert!(!update.is_empty());
}
