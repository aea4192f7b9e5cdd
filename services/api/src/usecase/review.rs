use chrono::Utc;

use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::policy::{Action, Actor, Resource, authorize};
use crate::domain::repository::{ReviewRepository, TitleRepository};
use crate::domain::types::{NewReview, Review, validate_score};
use crate::error::{ApiError, FieldErrors};

/// Load a review through its title; a review under another title is not found.
pub(crate) async fn find_review<T, R>(
    titles: &T,
    reviews: &R,
    title_id: i64,
    review_id: i64,
) -> Result<Review, ApiError>
where
    T: TitleRepository,
    R: ReviewRepository,
{
    if !titles.exists(title_id).await? {
        return Err(ApiError::TitleNotFound);
    }
    reviews
        .find(title_id, review_id)
        .await?
        .ok_or(ApiError::ReviewNotFound)
}

#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub text: Option<String>,
    pub score: Option<i64>,
}

fn check_text(errors: &mut FieldErrors, text: Option<&str>) {
    if text.is_some_and(|t| t.trim().is_empty()) {
        errors.add("text", FieldErrors::REQUIRED);
    }
}

fn check_score(errors: &mut FieldErrors, score: Option<i64>) -> Option<i16> {
    match score.map(validate_score) {
        Some(Ok(score)) => Some(score),
        Some(Err(message)) => {
            errors.add("score", message);
            None
        }
        None => None,
    }
}

// ── ListReviews / GetReview ──────────────────────────────────────────────────

pub struct ListReviewsUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> ListReviewsUseCase<T, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i64,
        page: PageRequest,
    ) -> Result<Page<Review>, ApiError> {
        authorize(actor, Resource::Review { author: None }, Action::List)?;
        if !self.titles.exists(title_id).await? {
            return Err(ApiError::TitleNotFound);
        }
        self.reviews.list(title_id, page.clamped()).await
    }
}

pub struct GetReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> GetReviewUseCase<T, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
    ) -> Result<Review, ApiError> {
        authorize(actor, Resource::Review { author: None }, Action::Retrieve)?;
        find_review(&self.titles, &self.reviews, title_id, review_id).await
    }
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> CreateReviewUseCase<T, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i64,
        input: ReviewInput,
    ) -> Result<Review, ApiError> {
        authorize(actor, Resource::Review { author: None }, Action::Create)?;
        let principal = actor.require_principal()?;

        let mut errors = FieldErrors::new();
        let text = errors.require("text", input.text);
        if input.score.is_none() {
            errors.add("score", FieldErrors::REQUIRED);
        }
        let score = check_score(&mut errors, input.score);
        let (Some(text), Some(score)) = (text, score) else {
            return Err(ApiError::Validation(errors));
        };

        if !self.titles.exists(title_id).await? {
            return Err(ApiError::TitleNotFound);
        }
        if self
            .reviews
            .exists_for_author(title_id, principal.id)
            .await?
        {
            return Err(ApiError::ReviewAlreadyExists);
        }

        self.reviews
            .create(&NewReview {
                title_id,
                author_id: principal.id,
                author: principal.username.clone(),
                text,
                score,
                pub_date: Utc::now(),
            })
            .await
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

pub struct UpdateReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> UpdateReviewUseCase<T, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        input: ReviewInput,
    ) -> Result<Review, ApiError> {
        authorize(actor, Resource::Review { author: None }, Action::Update)?;
        let review = find_review(&self.titles, &self.reviews, title_id, review_id).await?;
        authorize(
            actor,
            Resource::Review {
                author: Some(review.author_id),
            },
            Action::Update,
        )?;

        let mut errors = FieldErrors::new();
        check_text(&mut errors, input.text.as_deref());
        let score = check_score(&mut errors, input.score);
        errors.into_result()?;

        self.reviews
            .update(review.id, input.text.as_deref(), score)
            .await?;
        find_review(&self.titles, &self.reviews, title_id, review_id).await
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> DeleteReviewUseCase<T, R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
    ) -> Result<(), ApiError> {
        authorize(actor, Resource::Review { author: None }, Action::Delete)?;
        let review = find_review(&self.titles, &self.reviews, title_id, review_id).await?;
        authorize(
            actor,
            Resource::Review {
                author: Some(review.author_id),
            },
            Action::Delete,
        )?;
        if !self.reviews.delete(review.id).await? {
            return Err(ApiError::ReviewNotFound);
        }
        Ok(())
    }
}
