#![allow(async_fn_in_trait)]

use uuid::Uuid;

use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::types::{
    Comment, NewComment, NewReview, NewTitle, Review, Tag, TagKind, Title, TitleChanges,
    TitleFilter, User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Users ordered by creation, optionally filtered by username substring.
    async fn list(&self, search: Option<&str>, page: PageRequest)
    -> Result<Page<User>, ApiError>;

    /// Insert a user. A concurrent duplicate surfaces as `UserAlreadyExists`.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Overwrite profile fields (username, email, names, bio, role).
    async fn update_profile(&self, user: &User) -> Result<(), ApiError>;

    async fn set_confirmation_code(&self, id: Uuid, code: Option<&str>)
    -> Result<(), ApiError>;

    /// Delete a user by username. Returns `true` if a row was deleted.
    async fn delete_by_username(&self, username: &str) -> Result<bool, ApiError>;
}

/// Repository for categories or genres.
pub trait TagRepository: Send + Sync {
    fn kind(&self) -> TagKind;

    async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<Tag>, ApiError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, ApiError>;

    /// Insert a tag. A duplicate slug surfaces as `SlugAlreadyExists`.
    async fn create(&self, name: &str, slug: &str) -> Result<Tag, ApiError>;

    /// Delete by slug. Returns `true` if a row was deleted.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiError>;
}

/// Repository for titles. Reads carry review score totals for rating.
pub trait TitleRepository: Send + Sync {
    async fn list(&self, filter: &TitleFilter, page: PageRequest)
    -> Result<Page<Title>, ApiError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Title>, ApiError>;
    async fn exists(&self, id: i64) -> Result<bool, ApiError>;

    /// Insert a title with its genre links. Returns the new id.
    async fn create(&self, title: &NewTitle) -> Result<i64, ApiError>;

    /// Apply a partial update. Replaces the genre set when `genre_ids` is set.
    async fn update(&self, id: i64, changes: &TitleChanges) -> Result<(), ApiError>;

    /// Delete a title with its reviews and their comments.
    async fn delete(&self, id: i64) -> Result<bool, ApiError>;
}

/// Repository for reviews, always scoped to a title.
pub trait ReviewRepository: Send + Sync {
    async fn list(&self, title_id: i64, page: PageRequest) -> Result<Page<Review>, ApiError>;
    async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, ApiError>;
    async fn exists_for_author(&self, title_id: i64, author_id: Uuid) -> Result<bool, ApiError>;

    /// Insert a review. A concurrent duplicate surfaces as `ReviewAlreadyExists`.
    async fn create(&self, review: &NewReview) -> Result<Review, ApiError>;
    async fn update(
        &self,
        review_id: i64,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<(), ApiError>;
    async fn delete(&self, review_id: i64) -> Result<bool, ApiError>;
}

/// Repository for comments, always scoped to a review.
pub trait CommentRepository: Send + Sync {
    async fn list(&self, review_id: i64, page: PageRequest) -> Result<Page<Comment>, ApiError>;
    async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, ApiError>;
    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError>;
    async fn update(&self, comment_id: i64, text: &str) -> Result<(), ApiError>;
    async fn delete(&self, comment_id: i64) -> Result<bool, ApiError>;
}

/// Outbound email. Failures surface as `ApiError::Delivery`.
pub trait Mailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str, to: &str) -> Result<(), ApiError>;
}
