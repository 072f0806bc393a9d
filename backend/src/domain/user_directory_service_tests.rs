//! Tests for the user directory service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    FixtureCredentialHasher, FixtureTokenService, MockTokenService, MockUserRepository,
    UserPersistenceError,
};
use crate::domain::{ErrorCode, PasswordDigest, Role, StoredCredentials};
use crate::test_support::clock::MutableClock;
use crate::test_support::fixtures::{profile, registration};

type Service<T> = UserDirectoryService<MockUserRepository, FixtureCredentialHasher, T>;

fn service(users: MockUserRepository) -> Service<FixtureTokenService> {
    service_with_tokens(users, FixtureTokenService)
}

fn service_with_tokens<T>(users: MockUserRepository, tokens: T) -> Service<T> {
    UserDirectoryService::new(
        Arc::new(users),
        Arc::new(FixtureCredentialHasher),
        Arc::new(tokens),
        Arc::new(MutableClock::fixed()),
    )
}

fn stored(email: &str, password: &str) -> StoredCredentials {
    let user = User::new(
        UserId::random(),
        EmailAddress::new(email).expect("email"),
        profile("Padaria Central"),
        Role::Producer,
        Utc::now(),
    );
    StoredCredentials {
        user,
        digest: PasswordDigest::new(format!("fixture${password}")),
    }
}

#[tokio::test]
async fn register_stores_user_and_issues_token() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .times(1)
        .return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user, digest| {
            user.email().as_ref() == "cook@example.com"
                && user.role() == Role::Cook
                && digest.as_str() == "fixture$correct horse battery staple"
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let session = service(users)
        .register(registration("Cook@Example.com", "Ana", Role::Cook))
        .await
        .expect("registration succeeds");

    assert_eq!(session.user.role(), Role::Cook);
    assert_eq!(
        FixtureTokenService.verify(session.token.as_str()),
        Ok(session.user.id())
    );
}

#[tokio::test]
async fn register_rejects_existing_email_before_hashing() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(Some(stored("cook@example.com", "pw"))));
    users.expect_insert().times(0);

    let err = service(users)
        .register(registration("cook@example.com", "Ana", Role::Cook))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::DuplicateEmail);
}

fn registration_with_role(role: &str) -> Registration {
    Registration::new(
        EmailAddress::new("cook@example.com").expect("email"),
        "correct horse battery staple",
        profile("Ana"),
        role,
    )
    .expect("registration")
}

#[tokio::test]
async fn register_reports_a_taken_email_ahead_of_an_unknown_role() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(Some(stored("cook@example.com", "pw"))));
    users.expect_insert().times(0);

    let err = service(users)
        .register(registration_with_role("chef"))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::DuplicateEmail);
}

#[tokio::test]
async fn register_rejects_unknown_roles_for_free_emails() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(None));
    users.expect_insert().times(0);

    let err = service(users)
        .register(registration_with_role("chef"))
        .await
        .expect_err("unknown role");
    assert_eq!(err.code(), ErrorCode::InvalidRole);
    assert_eq!(err.details().and_then(|d| d.get("field")), Some(&serde_json::json!("role")));
}

#[tokio::test]
async fn register_maps_insert_race_to_duplicate_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(|_| Ok(None));
    users
        .expect_insert()
        .return_once(|_, _| Err(UserPersistenceError::duplicate_email("cook@example.com")));

    let err = service(users)
        .register(registration("cook@example.com", "Ana", Role::Cook))
        .await
        .expect_err("lost race");
    assert_eq!(err.code(), ErrorCode::DuplicateEmail);
}

#[rstest]
#[case("producer@example.com", "wrong")]
#[case("nobody@example.com", "pw")]
#[case("not-an-email", "pw")]
#[tokio::test]
async fn authenticate_failures_are_indistinguishable(
    #[case] email: &str,
    #[case] password: &str,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .returning(|email| {
            Ok((email.as_ref() == "producer@example.com").then(|| stored(email.as_ref(), "pw")))
        });

    let creds = LoginCredentials::try_from_parts(email, password).expect("credential shape");
    let err = service(users)
        .authenticate(&creds)
        .await
        .expect_err("bad credentials");
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    assert_eq!(err.message(), BAD_CREDENTIALS);
}

#[tokio::test]
async fn authenticate_issues_token_for_matching_password() {
    let record = stored("producer@example.com", "pw");
    let expected = record.user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials_by_email()
        .return_once(move |_| Ok(Some(record)));

    let creds = LoginCredentials::try_from_parts(" Producer@Example.com", "pw").expect("creds");
    let session = service(users).authenticate(&creds).await.expect("login");
    assert_eq!(session.user.id(), expected);
}

#[tokio::test]
async fn current_user_reports_missing_user_as_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(users)
        .current_user(&UserId::random())
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn repository_connection_failure_is_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));

    let err = service(users)
        .current_user(&UserId::random())
        .await
        .expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(TokenError::Expired, ErrorCode::Unauthorized)]
#[case(TokenError::invalid("bad signature"), ErrorCode::Unauthorized)]
#[case(TokenError::signing("no key"), ErrorCode::InternalError)]
fn resolve_token_maps_token_errors(#[case] failure: TokenError, #[case] expected: ErrorCode) {
    let mut tokens = MockTokenService::new();
    tokens.expect_verify().return_once(move |_| Err(failure));

    let err = service_with_tokens(MockUserRepository::new(), tokens)
        .resolve_token("token")
        .expect_err("token rejected");
    assert_eq!(err.code(), expected);
}
