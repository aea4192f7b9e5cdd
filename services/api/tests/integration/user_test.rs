use yamdb_api::domain::policy::Actor;
use yamdb_api::error::ApiError;
use yamdb_api::usecase::user::{
    CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase, ListUsersUseCase,
    UpdateMeUseCase, UpdateUserUseCase, UserChanges,
};
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;

use crate::helpers::{MockUserRepo, actor_of, test_user};

// ── Admin endpoints ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_users_for_admin_only() {
    let admin = test_user("root", UserRole::Admin);
    let bob = test_user("bob", UserRole::User);
    let repo = MockUserRepo::new(vec![admin.clone(), bob.clone()]);

    let page = ListUsersUseCase { repo: repo.clone() }
        .execute(&actor_of(&admin), None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.count, 2);

    let denied = ListUsersUseCase { repo: repo.clone() }
        .execute(&actor_of(&bob), None, PageRequest::default())
        .await;
    assert!(matches!(denied, Err(ApiError::Forbidden)), "got {denied:?}");

    let anonymous = ListUsersUseCase { repo }
        .execute(&Actor::Anonymous, None, PageRequest::default())
        .await;
    assert!(
        matches!(anonymous, Err(ApiError::Unauthenticated)),
        "got {anonymous:?}"
    );
}

#[tokio::test]
async fn should_filter_users_by_search() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![
        admin.clone(),
        test_user("alice", UserRole::User),
        test_user("alicia", UserRole::User),
    ]);

    let page = ListUsersUseCase { repo }
        .execute(&actor_of(&admin), Some("ali"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.count, 2);
}

#[tokio::test]
async fn should_treat_staff_flag_as_admin() {
    let mut staff = test_user("staff", UserRole::User);
    staff.is_staff = true;
    let repo = MockUserRepo::new(vec![staff.clone()]);

    let result = GetUserUseCase { repo }
        .execute(&actor_of(&staff), "staff")
        .await;
    assert!(result.is_ok(), "got {result:?}");
}

#[tokio::test]
async fn should_create_user_as_admin() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![admin.clone()]);

    let user = CreateUserUseCase { repo: repo.clone() }
        .execute(
            &actor_of(&admin),
            UserChanges {
                username: Some("carol".into()),
                email: Some("carol@example.com".into()),
                role: Some("moderator".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Moderator);
    assert_eq!(user.confirmation_code, None);
    assert!(repo.get("carol").is_some());
}

#[tokio::test]
async fn should_reject_unknown_role() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![admin.clone()]);

    let result = CreateUserUseCase { repo }
        .execute(
            &actor_of(&admin),
            UserChanges {
                username: Some("carol".into()),
                email: Some("carol@example.com".into()),
                role: Some("superhero".into()),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(ApiError::Validation(errors)) => assert!(errors.get("role").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_duplicate_username_on_create() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![admin.clone(), test_user("bob", UserRole::User)]);

    let result = CreateUserUseCase { repo }
        .execute(
            &actor_of(&admin),
            UserChanges {
                username: Some("bob".into()),
                email: Some("fresh@example.com".into()),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(ApiError::Validation(errors)) => assert!(errors.get("username").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_change_role_as_admin() {
    let admin = test_user("root", UserRole::Admin);
    let bob = test_user("bob", UserRole::User);
    let repo = MockUserRepo::new(vec![admin.clone(), bob]);

    let user = UpdateUserUseCase { repo: repo.clone() }
        .execute(
            &actor_of(&admin),
            "bob",
            UserChanges {
                role: Some("moderator".into()),
                bio: Some("reviewer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Moderator);
    let stored = repo.get("bob").unwrap();
    assert_eq!(stored.role, UserRole::Moderator);
    assert_eq!(stored.bio, "reviewer");
}

#[tokio::test]
async fn should_keep_own_username_on_update() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![admin.clone(), test_user("bob", UserRole::User)]);

    let result = UpdateUserUseCase { repo }
        .execute(
            &actor_of(&admin),
            "bob",
            UserChanges {
                username: Some("bob".into()),
                email: Some("bob@example.com".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(result.is_ok(), "got {result:?}");
}

#[tokio::test]
async fn should_delete_user_and_report_missing() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![admin.clone(), test_user("bob", UserRole::User)]);
    let uc = DeleteUserUseCase { repo: repo.clone() };

    uc.execute(&actor_of(&admin), "bob").await.unwrap();
    assert!(repo.get("bob").is_none());

    let again = uc.execute(&actor_of(&admin), "bob").await;
    assert!(matches!(again, Err(ApiError::UserNotFound)), "got {again:?}");
}

#[tokio::test]
async fn should_forbid_moderator_from_admin_endpoints() {
    let moderator = test_user("mod", UserRole::Moderator);
    let repo = MockUserRepo::new(vec![moderator.clone(), test_user("bob", UserRole::User)]);

    let result = DeleteUserUseCase { repo: repo.clone() }
        .execute(&actor_of(&moderator), "bob")
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");
    assert!(repo.get("bob").is_some());
}

// ── /users/me ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_own_profile() {
    let bob = test_user("bob", UserRole::User);
    let repo = MockUserRepo::new(vec![bob.clone()]);

    let me = GetMeUseCase { repo }.execute(&actor_of(&bob)).await.unwrap();
    assert_eq!(me.id, bob.id);
}

#[tokio::test]
async fn should_require_authentication_for_me() {
    let result = GetMeUseCase {
        repo: MockUserRepo::default(),
    }
    .execute(&Actor::Anonymous)
    .await;
    assert!(
        matches!(result, Err(ApiError::Unauthenticated)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_ignore_role_in_self_update_for_non_admin() {
    let bob = test_user("bob", UserRole::User);
    let repo = MockUserRepo::new(vec![bob.clone()]);

    let me = UpdateMeUseCase { repo: repo.clone() }
        .execute(
            &actor_of(&bob),
            UserChanges {
                first_name: Some("Bob".into()),
                role: Some("admin".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(me.role, UserRole::User);
    assert_eq!(me.first_name, "Bob");
    assert_eq!(repo.get("bob").unwrap().role, UserRole::User);
}

#[tokio::test]
async fn should_allow_admin_to_change_own_role() {
    let admin = test_user("root", UserRole::Admin);
    let repo = MockUserRepo::new(vec![admin.clone()]);

    let me = UpdateMeUseCase { repo }
        .execute(
            &actor_of(&admin),
            UserChanges {
                role: Some("moderator".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(me.role, UserRole::Moderator);
}

#[tokio::test]
async fn should_reject_reserved_username_in_self_update() {
    let bob = test_user("bob", UserRole::User);
    let repo = MockUserRepo::new(vec![bob.clone()]);

    let result = UpdateMeUseCase { repo }
        .execute(
            &actor_of(&bob),
            UserChanges {
                username: Some("me".into()),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(ApiError::Validation(errors)) => assert!(errors.get("username").is_some()),
        other => panic!("expected Validation, got {other:?}"),
    }
}
