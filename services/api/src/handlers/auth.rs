use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::signup::{SignupInput, SignupUseCase};
use crate::usecase::token::{IssueTokenInput, IssueTokenUseCase};

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<Json<SignupResponse>, ApiError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
        code_len: state.confirmation_code_len,
    };
    let out = usecase
        .execute(SignupInput {
            username: body.username,
            email: body.email,
        })
        .await?;
    Ok(Json(SignupResponse {
        username: out.username,
        email: out.email,
    }))
}

// ── POST /auth/token ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<TokenRequest>, ApiError>,
) -> Result<Json<TokenResponse>, ApiError> {
    let usecase = IssueTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
        ttl_secs: state.token_ttl_secs,
    };
    let out = usecase
        .execute(IssueTokenInput {
            username: body.username,
            confirmation_code: body.confirmation_code,
        })
        .await?;
    Ok(Json(TokenResponse { token: out.token }))
}
