use yamdb_api::error::ApiError;
use yamdb_api::usecase::token::{IssueTokenInput, IssueTokenUseCase};
use yamdb_auth_types::token::validate_access_token;
use yamdb_domain::user::UserRole;

use crate::helpers::{MockUserRepo, TEST_JWT_SECRET, test_user};

fn usecase(users: MockUserRepo) -> IssueTokenUseCase<MockUserRepo> {
    IssueTokenUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        ttl_secs: 3600,
    }
}

fn input(username: &str, code: &str) -> IssueTokenInput {
    IssueTokenInput {
        username: Some(username.to_owned()),
        confirmation_code: Some(code.to_owned()),
    }
}

#[tokio::test]
async fn should_issue_token_for_matching_code() {
    let mut bob = test_user("bob", UserRole::User);
    bob.confirmation_code = Some("ABC123".into());
    let users = MockUserRepo::new(vec![bob.clone()]);

    let out = usecase(users.clone())
        .execute(input("bob", "ABC123"))
        .await
        .unwrap();

    let info = validate_access_token(&out.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, bob.id);
    assert_eq!(info.exp, out.exp);
}

#[tokio::test]
async fn should_clear_code_after_exchange() {
    let mut bob = test_user("bob", UserRole::User);
    bob.confirmation_code = Some("ABC123".into());
    let users = MockUserRepo::new(vec![bob]);
    let uc = usecase(users.clone());

    uc.execute(input("bob", "ABC123")).await.unwrap();
    assert_eq!(users.get("bob").unwrap().confirmation_code, None);

    let replay = uc.execute(input("bob", "ABC123")).await;
    assert!(
        matches!(replay, Err(ApiError::InvalidConfirmationCode)),
        "expected InvalidConfirmationCode, got {replay:?}"
    );
}

#[tokio::test]
async fn should_reject_wrong_code() {
    let mut bob = test_user("bob", UserRole::User);
    bob.confirmation_code = Some("ABC123".into());
    let users = MockUserRepo::new(vec![bob]);

    let result = usecase(users.clone()).execute(input("bob", "WRONG")).await;
    assert!(
        matches!(result, Err(ApiError::InvalidConfirmationCode)),
        "expected InvalidConfirmationCode, got {result:?}"
    );
    assert_eq!(
        users.get("bob").unwrap().confirmation_code.as_deref(),
        Some("ABC123")
    );
}

#[tokio::test]
async fn should_return_not_found_for_unknown_username() {
    let result = usecase(MockUserRepo::default())
        .execute(input("ghost", "ABC123"))
        .await;
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_username_and_code() {
    let result = usecase(MockUserRepo::default())
        .execute(IssueTokenInput {
            username: Some("bob".into()),
            confirmation_code: None,
        })
        .await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert!(errors.get("username").is_none());
            assert_eq!(errors.get("confirmation_code"), Some("this field is required"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}
