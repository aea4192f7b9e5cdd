use uuid::Uuid;

use yamdb_api::auth::resolve_actor;
use yamdb_api::domain::policy::Actor;
use yamdb_api::error::ApiError;
use yamdb_domain::user::UserRole;
use yamdb_testing::auth::MockAuth;

use crate::helpers::{MockUserRepo, TEST_JWT_SECRET, test_user};

#[tokio::test]
async fn should_resolve_missing_token_to_anonymous() {
    let actor = resolve_actor(&MockUserRepo::default(), TEST_JWT_SECRET, None)
        .await
        .unwrap();
    assert_eq!(actor, Actor::Anonymous);
}

#[tokio::test]
async fn should_resolve_token_to_stored_user() {
    let bob = test_user("bob", UserRole::Moderator);
    let users = MockUserRepo::new(vec![bob.clone()]);
    let auth = MockAuth::new(bob.id);

    let actor = resolve_actor(&users, TEST_JWT_SECRET, Some(&auth.token))
        .await
        .unwrap();
    let principal = actor.principal().unwrap();
    assert_eq!(principal.id, bob.id);
    assert_eq!(principal.username, "bob");
    assert_eq!(principal.role, UserRole::Moderator);
}

#[tokio::test]
async fn should_pick_up_role_change_without_new_token() {
    let bob = test_user("bob", UserRole::User);
    let users = MockUserRepo::new(vec![bob.clone()]);
    let auth = MockAuth::new(bob.id);

    users.users.lock().unwrap()[0].role = UserRole::Admin;

    let actor = resolve_actor(&users, TEST_JWT_SECRET, Some(&auth.token))
        .await
        .unwrap();
    assert!(actor.is_admin());
}

#[tokio::test]
async fn should_reject_token_for_deleted_user() {
    let auth = MockAuth::new(Uuid::now_v7());

    let result = resolve_actor(&MockUserRepo::default(), TEST_JWT_SECRET, Some(&auth.token)).await;
    assert!(
        matches!(result, Err(ApiError::Unauthenticated)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_token_with_wrong_signature() {
    let bob = test_user("bob", UserRole::User);
    let users = MockUserRepo::new(vec![bob.clone()]);
    let auth = MockAuth::new(bob.id);

    let result = resolve_actor(&users, "another-secret", Some(&auth.token)).await;
    assert!(
        matches!(result, Err(ApiError::Unauthenticated)),
        "got {result:?}"
    );
}
