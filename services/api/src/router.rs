use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use yamdb_core::health::{healthz, readiness};
use yamdb_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{create_token, signup},
    categories::{create_category, delete_category, list_categories},
    comments::{create_comment, delete_comment, get_comment, list_comments, update_comment},
    genres::{create_genre, delete_genre, list_genres},
    reviews::{create_review, delete_review, get_review, list_reviews, update_review},
    titles::{create_title, delete_title, get_title, list_titles, update_title},
    users::{create_user, delete_user, get_me, get_user, list_users, update_me, update_user},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(&state.db).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Identity
        .route("/auth/signup", post(signup))
        .route("/auth/token", post(create_token))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(get_me).patch(update_me))
        .route(
            "/users/{username}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        // Catalogue
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{slug}", delete(delete_category))
        .route("/genres", get(list_genres).post(create_genre))
        .route("/genres/{slug}", delete(delete_genre))
        .route("/titles", get(list_titles).post(create_title))
        .route(
            "/titles/{title_id}",
            get(get_title).patch(update_title).delete(delete_title),
        )
        // Reviews and comments
        .route(
            "/titles/{title_id}/reviews",
            get(list_reviews).post(create_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(get_review).patch(update_review).delete(delete_review),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(get_comment).patch(update_comment).delete(delete_comment),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
