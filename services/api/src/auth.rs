//! Resolves the caller of a request into an [`Actor`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use yamdb_auth_types::bearer::BearerToken;
use yamdb_auth_types::token::validate_access_token;

use crate::domain::policy::{Actor, Principal};
use crate::domain::repository::UserRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// No token is an anonymous actor. A bad token, or one whose user no longer
/// exists, is `Unauthenticated`. The role comes from the stored user, never
/// from the token.
pub async fn resolve_actor<U: UserRepository>(
    users: &U,
    jwt_secret: &str,
    token: Option<&str>,
) -> Result<Actor, ApiError> {
    let Some(token) = token else {
        return Ok(Actor::Anonymous);
    };
    let info =
        validate_access_token(token, jwt_secret).map_err(|_| ApiError::Unauthenticated)?;
    let user = users
        .find_by_id(info.user_id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    Ok(Actor::User(Principal {
        id: user.id,
        role: user.effective_role(),
        username: user.username,
    }))
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;
        resolve_actor(&state.user_repo(), &state.jwt_secret, token.as_deref()).await
    }
}
