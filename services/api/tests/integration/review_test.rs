use yamdb_api::domain::policy::Actor;
use yamdb_api::error::ApiError;
use yamdb_api::usecase::review::{
    CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase, ListReviewsUseCase, ReviewInput,
    UpdateReviewUseCase,
};
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::rating::rating_from_scores;
use yamdb_domain::user::UserRole;

use crate::helpers::{MockReviewRepo, MockTitleRepo, actor_of, test_review, test_title, test_user};

fn titles() -> MockTitleRepo {
    MockTitleRepo::new(vec![test_title(1, "Dune"), test_title(2, "Solaris")])
}

fn review_input(text: &str, score: i64) -> ReviewInput {
    ReviewInput {
        text: Some(text.to_owned()),
        score: Some(score),
    }
}

#[tokio::test]
async fn should_create_review_for_authenticated_user() {
    let bob = test_user("bob", UserRole::User);
    let reviews = MockReviewRepo::default();

    let review = CreateReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    }
    .execute(&actor_of(&bob), 1, review_input("Great", 9))
    .await
    .unwrap();

    assert_eq!(review.author, "bob");
    assert_eq!(review.author_id, bob.id);
    assert_eq!(review.score, 9);
    assert_eq!(review.title_id, 1);
    assert!(reviews.get(review.id).is_some());
}

#[tokio::test]
async fn should_reject_second_review_for_same_title() {
    let bob = test_user("bob", UserRole::User);
    let reviews = MockReviewRepo::new(vec![test_review(1, 1, &bob, 7)]);
    let uc = CreateReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    };

    let result = uc.execute(&actor_of(&bob), 1, review_input("Again", 8)).await;
    assert!(
        matches!(result, Err(ApiError::ReviewAlreadyExists)),
        "got {result:?}"
    );

    // A different title is fine.
    uc.execute(&actor_of(&bob), 2, review_input("Other", 8))
        .await
        .unwrap();
    assert_eq!(reviews.reviews.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_reject_score_out_of_range() {
    let bob = test_user("bob", UserRole::User);
    let reviews = MockReviewRepo::default();
    let uc = CreateReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    };

    for score in [0, 11, -1] {
        let result = uc.execute(&actor_of(&bob), 1, review_input("Meh", score)).await;
        match result {
            Err(ApiError::Validation(errors)) => assert!(errors.get("score").is_some()),
            other => panic!("expected Validation for {score}, got {other:?}"),
        }
    }
    assert!(reviews.reviews.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_review_text_and_score() {
    let bob = test_user("bob", UserRole::User);
    let result = CreateReviewUseCase {
        titles: titles(),
        reviews: MockReviewRepo::default(),
    }
    .execute(&actor_of(&bob), 1, ReviewInput::default())
    .await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(errors.get("text"), Some("this field is required"));
            assert_eq!(errors.get("score"), Some("this field is required"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_require_authentication_to_review() {
    let result = CreateReviewUseCase {
        titles: titles(),
        reviews: MockReviewRepo::default(),
    }
    .execute(&Actor::Anonymous, 1, review_input("Great", 9))
    .await;
    assert!(
        matches!(result, Err(ApiError::Unauthenticated)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_review_on_missing_title() {
    let bob = test_user("bob", UserRole::User);
    let result = CreateReviewUseCase {
        titles: titles(),
        reviews: MockReviewRepo::default(),
    }
    .execute(&actor_of(&bob), 99, review_input("Great", 9))
    .await;
    assert!(matches!(result, Err(ApiError::TitleNotFound)), "got {result:?}");
}

#[tokio::test]
async fn should_not_find_review_through_another_title() {
    let bob = test_user("bob", UserRole::User);
    let uc = GetReviewUseCase {
        titles: titles(),
        reviews: MockReviewRepo::new(vec![test_review(1, 1, &bob, 7)]),
    };

    uc.execute(&Actor::Anonymous, 1, 1).await.unwrap();
    let result = uc.execute(&Actor::Anonymous, 2, 1).await;
    assert!(
        matches!(result, Err(ApiError::ReviewNotFound)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_list_reviews_of_title_only() {
    let bob = test_user("bob", UserRole::User);
    let alice = test_user("alice", UserRole::User);
    let uc = ListReviewsUseCase {
        titles: titles(),
        reviews: MockReviewRepo::new(vec![
            test_review(1, 1, &bob, 7),
            test_review(2, 1, &alice, 10),
            test_review(3, 2, &bob, 4),
        ]),
    };

    let page = uc
        .execute(&Actor::Anonymous, 1, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.count, 2);
    let scores: Vec<i16> = page.results.iter().map(|r| r.score).collect();
    assert_eq!(rating_from_scores(&scores), 8);

    let missing = uc.execute(&Actor::Anonymous, 99, PageRequest::default()).await;
    assert!(
        matches!(missing, Err(ApiError::TitleNotFound)),
        "got {missing:?}"
    );
}

#[tokio::test]
async fn should_let_author_update_own_review() {
    let bob = test_user("bob", UserRole::User);
    let reviews = MockReviewRepo::new(vec![test_review(1, 1, &bob, 7)]);

    let updated = UpdateReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    }
    .execute(
        &actor_of(&bob),
        1,
        1,
        ReviewInput {
            text: None,
            score: Some(3),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.score, 3);
    assert_eq!(updated.text, "review 1");
}

#[tokio::test]
async fn should_forbid_other_user_from_editing_review() {
    let bob = test_user("bob", UserRole::User);
    let mallory = test_user("mallory", UserRole::User);
    let reviews = MockReviewRepo::new(vec![test_review(1, 1, &bob, 7)]);
    let update = UpdateReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    };
    let delete = DeleteReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    };

    let result = update
        .execute(&actor_of(&mallory), 1, 1, review_input("Hacked", 1))
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");
    let result = delete.execute(&actor_of(&mallory), 1, 1).await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");

    assert_eq!(reviews.get(1).unwrap().score, 7);
}

#[tokio::test]
async fn should_let_moderator_delete_any_review() {
    let bob = test_user("bob", UserRole::User);
    let moderator = test_user("mod", UserRole::Moderator);
    let reviews = MockReviewRepo::new(vec![test_review(1, 1, &bob, 7)]);

    DeleteReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    }
    .execute(&actor_of(&moderator), 1, 1)
    .await
    .unwrap();

    assert!(reviews.get(1).is_none());
}

#[tokio::test]
async fn should_validate_partial_review_update() {
    let bob = test_user("bob", UserRole::User);
    let reviews = MockReviewRepo::new(vec![test_review(1, 1, &bob, 7)]);

    let result = UpdateReviewUseCase {
        titles: titles(),
        reviews: reviews.clone(),
    }
    .execute(
        &actor_of(&bob),
        1,
        1,
        ReviewInput {
            text: Some("  ".into()),
            score: Some(12),
        },
    )
    .await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert!(errors.get("text").is_some());
            assert!(errors.get("score").is_some());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(reviews.get(1).unwrap().score, 7);
}
