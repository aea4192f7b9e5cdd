use yamdb_api::error::ApiError;
use yamdb_api::usecase::signup::{CONFIRMATION_SUBJECT, SignupInput, SignupUseCase};
use yamdb_domain::user::UserRole;

use crate::helpers::{MockMailer, MockUserRepo, test_user};

fn input(username: &str, email: &str) -> SignupInput {
    SignupInput {
        username: Some(username.to_owned()),
        email: Some(email.to_owned()),
    }
}

fn usecase(users: MockUserRepo, mailer: MockMailer) -> SignupUseCase<MockUserRepo, MockMailer> {
    SignupUseCase {
        users,
        mailer,
        code_len: 12,
    }
}

#[tokio::test]
async fn should_create_user_and_send_code() {
    let users = MockUserRepo::default();
    let mailer = MockMailer::default();
    let uc = usecase(users.clone(), mailer.clone());

    let out = uc.execute(input("alice", "alice@example.com")).await.unwrap();
    assert_eq!(out.username, "alice");
    assert_eq!(out.email, "alice@example.com");

    let stored = users.get("alice").unwrap();
    assert_eq!(stored.role, UserRole::User);
    let code = stored.confirmation_code.expect("code stored");
    assert_eq!(code.len(), 12);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, CONFIRMATION_SUBJECT);
    assert!(sent[0].body.contains(&code));
}

#[tokio::test]
async fn should_resend_same_code_on_identical_replay() {
    let mut bob = test_user("bob", UserRole::User);
    bob.confirmation_code = Some("ABC123".into());
    let users = MockUserRepo::new(vec![bob]);
    let mailer = MockMailer::default();
    let uc = usecase(users.clone(), mailer.clone());

    let out = uc.execute(input("bob", "bob@example.com")).await.unwrap();
    assert_eq!(out.username, "bob");

    assert_eq!(users.len(), 1);
    assert_eq!(
        users.get("bob").unwrap().confirmation_code.as_deref(),
        Some("ABC123")
    );
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("ABC123"));
}

#[tokio::test]
async fn should_issue_fresh_code_on_replay_after_code_was_used() {
    let bob = test_user("bob", UserRole::User);
    let users = MockUserRepo::new(vec![bob]);
    let mailer = MockMailer::default();
    let uc = usecase(users.clone(), mailer.clone());

    uc.execute(input("bob", "bob@example.com")).await.unwrap();

    let code = users.get("bob").unwrap().confirmation_code.expect("new code");
    assert_eq!(code.len(), 12);
    assert!(mailer.sent()[0].body.contains(&code));
}

#[tokio::test]
async fn should_reject_reserved_username() {
    let mailer = MockMailer::default();
    let uc = usecase(MockUserRepo::default(), mailer.clone());

    let result = uc.execute(input("me", "a@b.com")).await;
    match result {
        Err(ApiError::Validation(errors)) => assert!(errors.get("username").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn should_require_both_fields() {
    let uc = usecase(MockUserRepo::default(), MockMailer::default());

    let result = uc
        .execute(SignupInput {
            username: None,
            email: Some("  ".into()),
        })
        .await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(errors.get("username"), Some("this field is required"));
            assert_eq!(errors.get("email"), Some("this field is required"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_taken_username_with_other_email() {
    let users = MockUserRepo::new(vec![test_user("bob", UserRole::User)]);
    let uc = usecase(users.clone(), MockMailer::default());

    let result = uc.execute(input("bob", "other@example.com")).await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert!(errors.get("username").is_some());
            assert!(errors.get("email").is_none());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn should_reject_taken_email_with_other_username() {
    let users = MockUserRepo::new(vec![test_user("bob", UserRole::User)]);
    let uc = usecase(users.clone(), MockMailer::default());

    let result = uc.execute(input("robert", "bob@example.com")).await;
    match result {
        Err(ApiError::Validation(errors)) => assert!(errors.get("email").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn should_reject_invalid_email() {
    let uc = usecase(MockUserRepo::default(), MockMailer::default());

    let result = uc.execute(input("alice", "not-an-email")).await;
    match result {
        Err(ApiError::Validation(errors)) => assert!(errors.get("email").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_surface_delivery_failure() {
    let uc = usecase(MockUserRepo::default(), MockMailer::failing());

    let result = uc.execute(input("alice", "alice@example.com")).await;
    assert!(
        matches!(result, Err(ApiError::Delivery(_))),
        "expected Delivery, got {result:?}"
    );
}
