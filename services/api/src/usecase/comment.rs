use chrono::Utc;

use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::policy::{Action, Actor, Resource, authorize};
use crate::domain::repository::{CommentRepository, ReviewRepository, TitleRepository};
use crate::domain::types::{Comment, NewComment};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::review::find_review;

/// Comment endpoints resolve title → review → comment; any missing link is a 404.
pub struct CommentUseCases<T, R, C>
where
    T: TitleRepository,
    R: ReviewRepository,
    C: CommentRepository,
{
    pub titles: T,
    pub reviews: R,
    pub comments: C,
}

impl<T, R, C> CommentUseCases<T, R, C>
where
    T: TitleRepository,
    R: ReviewRepository,
    C: CommentRepository,
{
    async fn find_comment(
        &self,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> Result<Comment, ApiError> {
        let review = find_review(&self.titles, &self.reviews, title_id, review_id).await?;
        self.comments
            .find(review.id, comment_id)
            .await?
            .ok_or(ApiError::CommentNotFound)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        page: PageRequest,
    ) -> Result<Page<Comment>, ApiError> {
        authorize(actor, Resource::Comment { author: None }, Action::List)?;
        let review = find_review(&self.titles, &self.reviews, title_id, review_id).await?;
        self.comments.list(review.id, page.clamped()).await
    }

    pub async fn get(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> Result<Comment, ApiError> {
        authorize(actor, Resource::Comment { author: None }, Action::Retrieve)?;
        self.find_comment(title_id, review_id, comment_id).await
    }

    pub async fn create(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        text: Option<String>,
    ) -> Result<Comment, ApiError> {
        authorize(actor, Resource::Comment { author: None }, Action::Create)?;
        let principal = actor.require_principal()?;

        let mut errors = FieldErrors::new();
        let text = errors.require("text", text);
        let Some(text) = text else {
            return Err(ApiError::Validation(errors));
        };

        let review = find_review(&self.titles, &self.reviews, title_id, review_id).await?;
        self.comments
            .create(&NewComment {
                review_id: review.id,
                author_id: principal.id,
                author: principal.username.clone(),
                text,
                pub_date: Utc::now(),
            })
            .await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
        text: Option<String>,
    ) -> Result<Comment, ApiError> {
        authorize(actor, Resource::Comment { author: None }, Action::Update)?;
        let comment = self.find_comment(title_id, review_id, comment_id).await?;
        authorize(
            actor,
            Resource::Comment {
                author: Some(comment.author_id),
            },
            Action::Update,
        )?;

        if let Some(text) = text {
            if text.trim().is_empty() {
                return Err(ApiError::Validation(FieldErrors::single(
                    "text",
                    FieldErrors::REQUIRED,
                )));
            }
            self.comments.update(comment.id, &text).await?;
        }
        self.find_comment(title_id, review_id, comment_id).await
    }

    pub async fn delete(
        &self,
        actor: &Actor,
        title_id: i64,
        review_id: i64,
        comment_id: i64,
    ) -> Result<(), ApiError> {
        authorize(actor, Resource::Comment { author: None }, Action::Delete)?;
        let comment = self.find_comment(title_id, review_id, comment_id).await?;
        authorize(
            actor,
            Resource::Comment {
                author: Some(comment.author_id),
            },
            Action::Delete,
        )?;
        if !self.comments.delete(comment.id).await? {
            return Err(ApiError::CommentNotFound);
        }
        Ok(())
    }
}
