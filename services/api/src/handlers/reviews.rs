use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use yamdb_domain::pagination::Page;

use crate::domain::policy::Actor;
use crate::domain::types::Review;
use crate::error::ApiError;
use crate::handlers::PageQuery;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase, ListReviewsUseCase, ReviewInput,
    UpdateReviewUseCase,
};

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub score: i16,
    #[serde(serialize_with = "yamdb_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            text: review.text,
            author: review.author,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub text: Option<String>,
    pub score: Option<i64>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(body: ReviewRequest) -> Self {
        Self {
            text: body.text,
            score: body.score,
        }
    }
}

// ── /titles/{title_id}/reviews ───────────────────────────────────────────────

pub async fn list_reviews(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(title_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ApiError>,
) -> Result<Json<Page<ReviewResponse>>, ApiError> {
    let usecase = ListReviewsUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let page = usecase.execute(&actor, title_id, query.page()).await?;
    Ok(Json(page.map(ReviewResponse::from)))
}

pub async fn create_review(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(title_id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<ReviewRequest>, ApiError>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let usecase = CreateReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase.execute(&actor, title_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

// ── /titles/{title_id}/reviews/{review_id} ───────────────────────────────────

pub async fn get_review(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let usecase = GetReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase.execute(&actor, title_id, review_id).await?;
    Ok(Json(review.into()))
}

pub async fn update_review(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<ReviewRequest>, ApiError>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let usecase = UpdateReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(&actor, title_id, review_id, body.into())
        .await?;
    Ok(Json(review.into()))
}

pub async fn delete_review(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    usecase.execute(&actor, title_id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
