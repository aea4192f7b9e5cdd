use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use yamdb_domain::pagination::Page;
use yamdb_domain::user::UserRole;

use crate::domain::policy::Actor;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::SearchQuery;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, GetUserUseCase, ListUsersUseCase,
    UpdateMeUseCase, UpdateUserUseCase, UserChanges,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// Body of `POST /users` and both `PATCH` routes. Absent fields stay untouched.
#[derive(Deserialize)]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

impl From<UserRequest> for UserChanges {
    fn from(body: UserRequest) -> Self {
        Self {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            bio: body.bio,
            role: body.role,
        }
    }
}

// ── /users ───────────────────────────────────────────────────────────────────

pub async fn list_users(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, ApiError>,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = usecase
        .execute(&actor, query.search.as_deref(), query.page())
        .await?;
    Ok(Json(page.map(UserResponse::from)))
}

pub async fn create_user(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UserRequest>, ApiError>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── /users/{username} ────────────────────────────────────────────────────────

pub async fn get_user(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(username), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor, &username).await?;
    Ok(Json(user.into()))
}

pub async fn update_user(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(username), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<UserRequest>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor, &username, body.into()).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Path(username), _): WithRejection<Path<String>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&actor, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /users/me ────────────────────────────────────────────────────────────────

pub async fn get_me(
    actor: Actor,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor).await?;
    Ok(Json(user.into()))
}

pub async fn update_me(
    actor: Actor,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<UserRequest>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = UpdateMeUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor, body.into()).await?;
    Ok(Json(user.into()))
}
