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
use crate::domain::types::Comment;
use crate::error::ApiError;
use crate::handlers::PageQuery;
use crate::infra::db::{DbCommentRepository, DbReviewRepository, DbTitleRepository};
use crate::state::AppState;
use crate::usecase::comment::CommentUseCases;

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    #[serde(serialize_with = "yamdb_core::serde::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author: comment.author,
            pub_date: comment.pub_date,
        }
    }
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

fn usecases(
    state: &AppState,
) -> CommentUseCases<DbTitleRepository, DbReviewRepository, DbCommentRepository> {
    CommentUseCases {
        titles: state.title_repo(),
        reviews: state.review_repo(),
        comments: state.comment_repo(),
    }
}

// ── /titles/{title_id}/reviews/{review_id}/comments ──────────────────────────

pub async fn list_comments(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ApiError>,
) -> Result<Json<Page<CommentResponse>>, ApiError> {
    let page = usecases(&state)
        .list(&actor, title_id, review_id, query.page())
        .await?;
    Ok(Json(page.map(CommentResponse::from)))
}

pub async fn create_comment(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id)), _): WithRejection<Path<(i64, i64)>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<CommentRequest>, ApiError>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = usecases(&state)
        .create(&actor, title_id, review_id, body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

// ── /titles/{title_id}/reviews/{review_id}/comments/{comment_id} ─────────────

pub async fn get_comment(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id, comment_id)), _): WithRejection<
        Path<(i64, i64, i64)>,
        ApiError,
    >,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = usecases(&state)
        .get(&actor, title_id, review_id, comment_id)
        .await?;
    Ok(Json(comment.into()))
}

pub async fn update_comment(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id, comment_id)), _): WithRejection<
        Path<(i64, i64, i64)>,
        ApiError,
    >,
    WithRejection(Json(body), _): WithRejection<Json<CommentRequest>, ApiError>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = usecases(&state)
        .update(&actor, title_id, review_id, comment_id, body.text)
        .await?;
    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path((title_id, review_id, comment_id)), _): WithRejection<
        Path<(i64, i64, i64)>,
        ApiError,
    >,
) -> Result<StatusCode, ApiError> {
    usecases(&state)
        .delete(&actor, title_id, review_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
