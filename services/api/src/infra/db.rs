use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Query},
};
use uuid::Uuid;

use yamdb_api_schema::{categories, comments, genre_titles, genres, reviews, titles, users};
use yamdb_core::sea_ext::{ContainsIgnoreCase, is_unique_violation};
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::rating::ScoreTotals;
use yamdb_domain::user::UserRole;

use crate::domain::repository::{
    CommentRepository, ReviewRepository, TagRepository, TitleRepository, UserRepository,
};
use crate::domain::types::{
    Comment, NewComment, NewReview, NewTitle, Review, Tag, TagKind, Title, TitleChanges,
    TitleFilter, User,
};
use crate::error::ApiError;

/// Map a unique-constraint violation to `conflict`, anything else to `Internal`.
fn conflict_or_internal(err: DbErr, conflict: ApiError, context: &'static str) -> ApiError {
    if is_unique_violation(&err) {
        conflict
    } else {
        ApiError::Internal(anyhow::Error::new(err).context(context))
    }
}

fn non_blank(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<User>, ApiError> {
        let mut query = users::Entity::find();
        if let Some(search) = non_blank(search) {
            query = query.contains_ignore_case(users::Column::Username, search);
        }
        let count = query.clone().count(&self.db).await.context("count users")?;
        let models = query
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list users")?;
        let results = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(count, results))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            bio: Set(user.bio.clone()),
            role: Set(user.role.as_str().to_owned()),
            confirmation_code: Set(user.confirmation_code.clone()),
            is_superuser: Set(user.is_superuser),
            is_staff: Set(user.is_staff),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| conflict_or_internal(e, ApiError::UserAlreadyExists, "create user"))?;
        Ok(())
    }

    async fn update_profile(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            bio: Set(user.bio.clone()),
            role: Set(user.role.as_str().to_owned()),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| conflict_or_internal(e, ApiError::UserAlreadyExists, "update user profile"))?;
        Ok(())
    }

    async fn set_confirmation_code(&self, id: Uuid, code: Option<&str>) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(
                users::Column::ConfirmationCode,
                Expr::value(code.map(str::to_owned)),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set confirmation code")?;
        Ok(())
    }

    async fn delete_by_username(&self, username: &str) -> Result<bool, ApiError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Username.eq(username))
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model.role.parse::<UserRole>().context("parse stored user role")?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        role,
        confirmation_code: model.confirmation_code,
        is_superuser: model.is_superuser,
        is_staff: model.is_staff,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbCategoryRepository {
    fn kind(&self) -> TagKind {
        TagKind::Category
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<Tag>, ApiError> {
        let mut query = categories::Entity::find();
        if let Some(search) = non_blank(search) {
            query = query.contains_ignore_case(categories::Column::Name, search);
        }
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count categories")?;
        let models = query
            .order_by_asc(categories::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(Page::new(
            count,
            models.into_iter().map(category_from_model).collect(),
        ))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, ApiError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find category by slug")?;
        Ok(model.map(category_from_model))
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Tag, ApiError> {
        let model = categories::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| conflict_or_internal(e, ApiError::SlugAlreadyExists, "create category"))?;
        Ok(category_from_model(model))
    }

    /// Titles in the category keep existing with `category_id = NULL` (FK `SET NULL`).
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiError> {
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .context("delete category")?;
        Ok(result.rows_affected > 0)
    }
}

fn category_from_model(model: categories::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Genre repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGenreRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbGenreRepository {
    fn kind(&self) -> TagKind {
        TagKind::Genre
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<Tag>, ApiError> {
        let mut query = genres::Entity::find();
        if let Some(search) = non_blank(search) {
            query = query.contains_ignore_case(genres::Column::Name, search);
        }
        let count = query.clone().count(&self.db).await.context("count genres")?;
        let models = query
            .order_by_asc(genres::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list genres")?;
        Ok(Page::new(
            count,
            models.into_iter().map(genre_from_model).collect(),
        ))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, ApiError> {
        let model = genres::Entity::find()
            .filter(genres::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find genre by slug")?;
        Ok(model.map(genre_from_model))
    }

    async fn create(&self, name: &str, slug: &str) -> Result<Tag, ApiError> {
        let model = genres::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| conflict_or_internal(e, ApiError::SlugAlreadyExists, "create genre"))?;
        Ok(genre_from_model(model))
    }

    /// Genre links cascade away; the titles themselves stay.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, ApiError> {
        let result = genres::Entity::delete_many()
            .filter(genres::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .context("delete genre")?;
        Ok(result.rows_affected > 0)
    }
}

fn genre_from_model(model: genres::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
    }
}

// ── Title repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTitleRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct ScoreRow {
    title_id: i64,
    total: Option<i64>,
    reviews: i64,
}

impl DbTitleRepository {
    /// Attach genres and review score totals to a batch of title rows.
    async fn hydrate(
        &self,
        rows: Vec<(titles::Model, Option<categories::Model>)>,
    ) -> Result<Vec<Title>, ApiError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|(title, _)| title.id).collect();

        let links = genre_titles::Entity::find()
            .filter(genre_titles::Column::TitleId.is_in(ids.iter().copied()))
            .order_by_asc(genre_titles::Column::GenreId)
            .find_also_related(genres::Entity)
            .all(&self.db)
            .await
            .context("load title genres")?;
        let mut genres_by_title: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (link, genre) in links {
            if let Some(genre) = genre {
                genres_by_title
                    .entry(link.title_id)
                    .or_default()
                    .push(genre_from_model(genre));
            }
        }

        // Rating is aggregated on every read; nothing is cached.
        let scores = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::TitleId)
            .column_as(reviews::Column::Score.sum(), "total")
            .column_as(reviews::Column::Score.count(), "reviews")
            .filter(reviews::Column::TitleId.is_in(ids.iter().copied()))
            .group_by(reviews::Column::TitleId)
            .into_model::<ScoreRow>()
            .all(&self.db)
            .await
            .context("aggregate review scores")?;
        let scores_by_title: HashMap<i64, ScoreTotals> = scores
            .into_iter()
            .map(|row| {
                let totals = ScoreTotals {
                    sum: row.total.unwrap_or(0),
                    count: row.reviews,
                };
                (row.title_id, totals)
            })
            .collect();

        Ok(rows
            .into_iter()
            .map(|(title, category)| Title {
                genres: genres_by_title.remove(&title.id).unwrap_or_default(),
                scores: scores_by_title.get(&title.id).copied().unwrap_or_default(),
                category: category.map(category_from_model),
                id: title.id,
                name: title.name,
                year: title.year,
                description: title.description,
            })
            .collect())
    }
}

impl TitleRepository for DbTitleRepository {
    async fn list(&self, filter: &TitleFilter, page: PageRequest) -> Result<Page<Title>, ApiError> {
        let mut query = titles::Entity::find();
        if let Some(slug) = &filter.category {
            query = query.filter(
                titles::Column::CategoryId.in_subquery(
                    Query::select()
                        .column(categories::Column::Id)
                        .from(categories::Entity)
                        .and_where(categories::Column::Slug.eq(slug.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(slug) = &filter.genre {
            query = query.filter(
                titles::Column::Id.in_subquery(
                    Query::select()
                        .column((genre_titles::Entity, genre_titles::Column::TitleId))
                        .from(genre_titles::Entity)
                        .inner_join(
                            genres::Entity,
                            Expr::col((genres::Entity, genres::Column::Id))
                                .equals((genre_titles::Entity, genre_titles::Column::GenreId)),
                        )
                        .and_where(genres::Column::Slug.eq(slug.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(name) = non_blank(filter.name.as_deref()) {
            query = query.contains_ignore_case(titles::Column::Name, name);
        }
        if let Some(year) = filter.year {
            query = query.filter(titles::Column::Year.eq(year));
        }

        let count = query.clone().count(&self.db).await.context("count titles")?;
        let rows = query
            .order_by_asc(titles::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await
            .context("list titles")?;
        Ok(Page::new(count, self.hydrate(rows).await?))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Title>, ApiError> {
        let row = titles::Entity::find_by_id(id)
            .find_also_related(categories::Entity)
            .one(&self.db)
            .await
            .context("find title by id")?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.pop())
    }

    async fn exists(&self, id: i64) -> Result<bool, ApiError> {
        let count = titles::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .context("check title exists")?;
        Ok(count > 0)
    }

    async fn create(&self, title: &NewTitle) -> Result<i64, ApiError> {
        let title = title.clone();
        let id = self
            .db
            .transaction::<_, i64, DbErr>(move |txn| {
                Box::pin(async move {
                    let model = titles::ActiveModel {
                        name: Set(title.name),
                        year: Set(title.year),
                        description: Set(title.description),
                        category_id: Set(Some(title.category_id)),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    if !title.genre_ids.is_empty() {
                        genre_titles::Entity::insert_many(title.genre_ids.iter().map(
                            |&genre_id| genre_titles::ActiveModel {
                                title_id: Set(model.id),
                                genre_id: Set(genre_id),
                            },
                        ))
                        .exec(txn)
                        .await?;
                    }
                    Ok(model.id)
                })
            })
            .await
            .context("create title with genres")?;
        Ok(id)
    }

    async fn update(&self, id: i64, changes: &TitleChanges) -> Result<(), ApiError> {
        let changes = changes.clone();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    let mut am = titles::ActiveModel {
                        id: Set(id),
                        ..Default::default()
                    };
                    if let Some(name) = changes.name {
                        am.name = Set(name);
                    }
                    if let Some(year) = changes.year {
                        am.year = Set(year);
                    }
                    if let Some(description) = changes.description {
                        am.description = Set(Some(description));
                    }
                    if let Some(category_id) = changes.category_id {
                        am.category_id = Set(Some(category_id));
                    }
                    if am.is_changed() {
                        am.update(txn).await?;
                    }

                    if let Some(genre_ids) = changes.genre_ids {
                        genre_titles::Entity::delete_many()
                            .filter(genre_titles::Column::TitleId.eq(id))
                            .exec(txn)
                            .await?;
                        if !genre_ids.is_empty() {
                            genre_titles::Entity::insert_many(genre_ids.iter().map(
                                |&genre_id| genre_titles::ActiveModel {
                                    title_id: Set(id),
                                    genre_id: Set(genre_id),
                                },
                            ))
                            .exec(txn)
                            .await?;
                        }
                    }
                    Ok(())
                })
            })
            .await
            .context("update title")?;
        Ok(())
    }

    /// Reviews, their comments and genre links go with the title (FK cascade).
    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = titles::Entity::delete_many()
            .filter(titles::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete title")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list(&self, title_id: i64, page: PageRequest) -> Result<Page<Review>, ApiError> {
        let query = reviews::Entity::find().filter(reviews::Column::TitleId.eq(title_id));
        let count = query.clone().count(&self.db).await.context("count reviews")?;
        let rows = query
            .order_by_asc(reviews::Column::PubDate)
            .order_by_asc(reviews::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list reviews")?;
        Ok(Page::new(
            count,
            rows.into_iter()
                .map(|(review, author)| review_from_model(review, author))
                .collect(),
        ))
    }

    async fn find(&self, title_id: i64, review_id: i64) -> Result<Option<Review>, ApiError> {
        let row = reviews::Entity::find_by_id(review_id)
            .filter(reviews::Column::TitleId.eq(title_id))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find review")?;
        Ok(row.map(|(review, author)| review_from_model(review, author)))
    }

    async fn exists_for_author(&self, title_id: i64, author_id: Uuid) -> Result<bool, ApiError> {
        let count = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .filter(reviews::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("check review exists for author")?;
        Ok(count > 0)
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        let model = reviews::ActiveModel {
            title_id: Set(review.title_id),
            author_id: Set(review.author_id),
            text: Set(review.text.clone()),
            score: Set(review.score),
            pub_date: Set(review.pub_date),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| conflict_or_internal(e, ApiError::ReviewAlreadyExists, "create review"))?;
        Ok(Review {
            id: model.id,
            title_id: model.title_id,
            author_id: model.author_id,
            author: review.author.clone(),
            text: model.text,
            score: model.score,
            pub_date: model.pub_date,
        })
    }

    async fn update(
        &self,
        review_id: i64,
        text: Option<&str>,
        score: Option<i16>,
    ) -> Result<(), ApiError> {
        let mut am = reviews::ActiveModel {
            id: Set(review_id),
            ..Default::default()
        };
        if let Some(text) = text {
            am.text = Set(text.to_owned());
        }
        if let Some(score) = score {
            am.score = Set(score);
        }
        if am.is_changed() {
            am.update(&self.db).await.context("update review")?;
        }
        Ok(())
    }

    async fn delete(&self, review_id: i64) -> Result<bool, ApiError> {
        let result = reviews::Entity::delete_many()
            .filter(reviews::Column::Id.eq(review_id))
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }
}

fn review_from_model(model: reviews::Model, author: Option<users::Model>) -> Review {
    Review {
        id: model.id,
        title_id: model.title_id,
        author_id: model.author_id,
        author: author.map(|u| u.username).unwrap_or_default(),
        text: model.text,
        score: model.score,
        pub_date: model.pub_date,
    }
}

// ── Comment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl CommentRepository for DbCommentRepository {
    async fn list(&self, review_id: i64, page: PageRequest) -> Result<Page<Comment>, ApiError> {
        let query = comments::Entity::find().filter(comments::Column::ReviewId.eq(review_id));
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count comments")?;
        let rows = query
            .order_by_asc(comments::Column::PubDate)
            .order_by_asc(comments::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list comments")?;
        Ok(Page::new(
            count,
            rows.into_iter()
                .map(|(comment, author)| comment_from_model(comment, author))
                .collect(),
        ))
    }

    async fn find(&self, review_id: i64, comment_id: i64) -> Result<Option<Comment>, ApiError> {
        let row = comments::Entity::find_by_id(comment_id)
            .filter(comments::Column::ReviewId.eq(review_id))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find comment")?;
        Ok(row.map(|(comment, author)| comment_from_model(comment, author)))
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        let model = comments::ActiveModel {
            review_id: Set(comment.review_id),
            author_id: Set(comment.author_id),
            text: Set(comment.text.clone()),
            pub_date: Set(comment.pub_date),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create comment")?;
        Ok(Comment {
            id: model.id,
            review_id: model.review_id,
            author_id: model.author_id,
            author: comment.author.clone(),
            text: model.text,
            pub_date: model.pub_date,
        })
    }

    async fn update(&self, comment_id: i64, text: &str) -> Result<(), ApiError> {
        comments::ActiveModel {
            id: Set(comment_id),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update comment")?;
        Ok(())
    }

    async fn delete(&self, comment_id: i64) -> Result<bool, ApiError> {
        let result = comments::Entity::delete_many()
            .filter(comments::Column::Id.eq(comment_id))
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_model(model: comments::Model, author: Option<users::Model>) -> Comment {
    Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: model.author_id,
        author: author.map(|u| u.username).unwrap_or_default(),
        text: model.text,
        pub_date: model.pub_date,
    }
}
