use yamdb_api::domain::policy::Actor;
use yamdb_api::domain::types::User;
use yamdb_api::error::ApiError;
use yamdb_api::usecase::comment::CommentUseCases;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;

use crate::helpers::{
    MockCommentRepo, MockReviewRepo, MockTitleRepo, actor_of, test_comment, test_review,
    test_title, test_user,
};

/// Title 1 with review 1 by `author`; title 2 with review 2 by `author`.
fn usecases(
    author: &User,
    comments: MockCommentRepo,
) -> CommentUseCases<MockTitleRepo, MockReviewRepo, MockCommentRepo> {
    CommentUseCases {
        titles: MockTitleRepo::new(vec![test_title(1, "Dune"), test_title(2, "Solaris")]),
        reviews: MockReviewRepo::new(vec![
            test_review(1, 1, author, 8),
            test_review(2, 2, author, 5),
        ]),
        comments,
    }
}

#[tokio::test]
async fn should_create_comment_on_review() {
    let bob = test_user("bob", UserRole::User);
    let alice = test_user("alice", UserRole::User);
    let comments = MockCommentRepo::default();
    let uc = usecases(&bob, comments.clone());

    let comment = uc
        .create(&actor_of(&alice), 1, 1, Some("Agreed".into()))
        .await
        .unwrap();
    assert_eq!(comment.author, "alice");
    assert_eq!(comment.review_id, 1);
    assert!(comments.get(comment.id).is_some());
}

#[tokio::test]
async fn should_require_comment_text() {
    let bob = test_user("bob", UserRole::User);
    let uc = usecases(&bob, MockCommentRepo::default());

    let result = uc.create(&actor_of(&bob), 1, 1, Some(" ".into())).await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(errors.get("text"), Some("this field is required"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_not_resolve_review_under_wrong_title() {
    let bob = test_user("bob", UserRole::User);
    let uc = usecases(&bob, MockCommentRepo::default());

    let result = uc.create(&actor_of(&bob), 2, 1, Some("Hi".into())).await;
    assert!(
        matches!(result, Err(ApiError::ReviewNotFound)),
        "got {result:?}"
    );

    let result = uc
        .list(&Actor::Anonymous, 99, 1, PageRequest::default())
        .await;
    assert!(matches!(result, Err(ApiError::TitleNotFound)), "got {result:?}");
}

#[tokio::test]
async fn should_not_resolve_comment_under_wrong_review() {
    let bob = test_user("bob", UserRole::User);
    let uc = usecases(&bob, MockCommentRepo::new(vec![test_comment(1, 1, &bob)]));

    uc.get(&Actor::Anonymous, 1, 1, 1).await.unwrap();
    let result = uc.get(&Actor::Anonymous, 2, 2, 1).await;
    assert!(
        matches!(result, Err(ApiError::CommentNotFound)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_list_comments_anonymously() {
    let bob = test_user("bob", UserRole::User);
    let uc = usecases(
        &bob,
        MockCommentRepo::new(vec![
            test_comment(1, 1, &bob),
            test_comment(2, 1, &bob),
            test_comment(3, 2, &bob),
        ]),
    );

    let page = uc
        .list(&Actor::Anonymous, 1, 1, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.count, 2);
}

#[tokio::test]
async fn should_restrict_comment_edits_to_author_or_staff() {
    let bob = test_user("bob", UserRole::User);
    let mallory = test_user("mallory", UserRole::User);
    let admin = test_user("root", UserRole::Admin);
    let comments = MockCommentRepo::new(vec![test_comment(1, 1, &bob)]);
    let uc = usecases(&bob, comments.clone());

    let result = uc
        .update(&actor_of(&mallory), 1, 1, 1, Some("Hacked".into()))
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");

    let updated = uc
        .update(&actor_of(&bob), 1, 1, 1, Some("Edited".into()))
        .await
        .unwrap();
    assert_eq!(updated.text, "Edited");

    uc.delete(&actor_of(&admin), 1, 1, 1).await.unwrap();
    assert!(comments.get(1).is_none());
}

#[tokio::test]
async fn should_require_authentication_to_delete_comment() {
    let bob = test_user("bob", UserRole::User);
    let comments = MockCommentRepo::new(vec![test_comment(1, 1, &bob)]);
    let uc = usecases(&bob, comments.clone());

    let result = uc.delete(&Actor::Anonymous, 1, 1, 1).await;
    assert!(
        matches!(result, Err(ApiError::Unauthenticated)),
        "got {result:?}"
    );
    assert!(comments.get(1).is_some());
}
