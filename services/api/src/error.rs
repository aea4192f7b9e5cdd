use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Field name → message, rendered flat into the error body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub const REQUIRED: &'static str = "this field is required";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for `field`. The first error per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record a required-field error when `value` is absent or blank.
    pub fn require(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.add(field, Self::REQUIRED);
                None
            }
        }
    }

    /// Record `check`'s error, if any, under `field`.
    pub fn check(&mut self, field: &'static str, check: Result<(), &'static str>) {
        if let Err(message) = check {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// API error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("malformed request")]
    Malformed(String),
    #[error("invalid confirmation code")]
    InvalidConfirmationCode,
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("genre not found")]
    GenreNotFound,
    #[error("title not found")]
    TitleNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("slug already exists")]
    SlugAlreadyExists,
    #[error("review already exists")]
    ReviewAlreadyExists,
    #[error("email delivery failed")]
    Delivery(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Malformed(_) => "MALFORMED_REQUEST",
            Self::InvalidConfirmationCode => "INVALID_CONFIRMATION_CODE",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::TitleNotFound => "TITLE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::CommentNotFound => "COMMENT_NOT_FOUND",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::SlugAlreadyExists => "SLUG_ALREADY_EXISTS",
            Self::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            Self::Delivery(_) => "DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Malformed(_) | Self::InvalidConfirmationCode => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::CategoryNotFound
            | Self::GenreNotFound
            | Self::TitleNotFound
            | Self::ReviewNotFound
            | Self::CommentNotFound => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists | Self::SlugAlreadyExists | Self::ReviewAlreadyExists => {
                StatusCode::CONFLICT
            }
            Self::Delivery(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors; TraceLayer already records them.
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = "INTERNAL", "internal error"),
            Self::Delivery(e) => {
                tracing::error!(error = ?e, kind = "DELIVERY_FAILED", "email delivery failed")
            }
            _ => {}
        }
        let mut body = serde_json::Map::new();
        body.insert("kind".into(), self.kind().into());
        body.insert("message".into(), self.to_string().into());
        match self {
            Self::Validation(FieldErrors(fields)) => {
                for (field, message) in fields {
                    body.insert(field.to_owned(), message.into());
                }
            }
            Self::InvalidConfirmationCode => {
                body.insert(
                    "confirmation_code".into(),
                    "invalid confirmation code".into(),
                );
            }
            Self::Malformed(detail) => {
                body.insert("detail".into(), detail.into());
            }
            _ => {}
        }
        (status, axum::Json(serde_json::Value::Object(body))).into_response()
    }
}
