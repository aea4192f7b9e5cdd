use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::policy::{Action, Actor, Resource, authorize};
use crate::domain::repository::{TagRepository, TitleRepository};
use crate::domain::types::{
    NewTitle, TITLE_NAME_MAX_LEN, Title, TitleChanges, TitleFilter, validate_max_chars,
    validate_year,
};
use crate::error::{ApiError, FieldErrors};
use crate::usecase::tag::not_found;

/// Title write payload. Create requires every field but `description`;
/// update treats all as optional.
#[derive(Debug, Clone, Default)]
pub struct TitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Genre slugs.
    pub genre: Option<Vec<String>>,
}

fn check_fields(errors: &mut FieldErrors, input: &TitleInput) {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            errors.add("name", FieldErrors::REQUIRED);
        }
        errors.check("name", validate_max_chars(name, TITLE_NAME_MAX_LEN));
    }
    if let Some(year) = input.year {
        errors.check("year", validate_year(year));
    }
}

async fn resolve_slug<R: TagRepository>(repo: &R, slug: &str) -> Result<i64, ApiError> {
    repo.find_by_slug(slug)
        .await?
        .map(|tag| tag.id)
        .ok_or_else(|| not_found(repo.kind()))
}

async fn resolve_slugs<R: TagRepository>(repo: &R, slugs: &[String]) -> Result<Vec<i64>, ApiError> {
    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let id = resolve_slug(repo, slug).await?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

// ── ListTitles ───────────────────────────────────────────────────────────────

pub struct ListTitlesUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> ListTitlesUseCase<T> {
    pub async fn execute(
        &self,
        actor: &Actor,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, ApiError> {
        authorize(actor, Resource::Title, Action::List)?;
        self.titles.list(&filter, page.clamped()).await
    }
}

// ── GetTitle ─────────────────────────────────────────────────────────────────

pub struct GetTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> GetTitleUseCase<T> {
    pub async fn execute(&self, actor: &Actor, id: i64) -> Result<Title, ApiError> {
        authorize(actor, Resource::Title, Action::Retrieve)?;
        self.titles
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TitleNotFound)
    }
}

// ── CreateTitle ──────────────────────────────────────────────────────────────

pub struct CreateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: TagRepository,
    G: TagRepository,
{
    pub titles: T,
    pub categories: C,
    pub genres: G,
}

impl<T, C, G> CreateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: TagRepository,
    G: TagRepository,
{
    pub async fn execute(&self, actor: &Actor, input: TitleInput) -> Result<Title, ApiError> {
        authorize(actor, Resource::Title, Action::Create)?;

        let mut errors = FieldErrors::new();
        if input.name.is_none() {
            errors.add("name", FieldErrors::REQUIRED);
        }
        if input.year.is_none() {
            errors.add("year", FieldErrors::REQUIRED);
        }
        if input.genre.is_none() {
            errors.add("genre", FieldErrors::REQUIRED);
        }
        check_fields(&mut errors, &input);
        let TitleInput {
            name,
            year,
            description,
            category,
            genre,
        } = input;
        let category = errors.require("category", category);
        let (Some(name), Some(year), Some(category), Some(genre)) = (name, year, category, genre)
        else {
            return Err(ApiError::Validation(errors));
        };
        errors.into_result()?;

        let category_id = resolve_slug(&self.categories, &category).await?;
        let genre_ids = resolve_slugs(&self.genres, &genre).await?;

        let id = self
            .titles
            .create(&NewTitle {
                name,
                year,
                description,
                category_id,
                genre_ids,
            })
            .await?;
        self.titles
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TitleNotFound)
    }
}

// ── UpdateTitle ──────────────────────────────────────────────────────────────

pub struct UpdateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: TagRepository,
    G: TagRepository,
{
    pub titles: T,
    pub categories: C,
    pub genres: G,
}

impl<T, C, G> UpdateTitleUseCase<T, C, G>
where
    T: TitleRepository,
    C: TagRepository,
    G: TagRepository,
{
    pub async fn execute(
        &self,
        actor: &Actor,
        id: i64,
        input: TitleInput,
    ) -> Result<Title, ApiError> {
        authorize(actor, Resource::Title, Action::Update)?;
        if !self.titles.exists(id).await? {
            return Err(ApiError::TitleNotFound);
        }

        let mut errors = FieldErrors::new();
        check_fields(&mut errors, &input);
        if input.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
            errors.add("category", FieldErrors::REQUIRED);
        }
        errors.into_result()?;

        let category_id = match &input.category {
            Some(slug) => Some(resolve_slug(&self.categories, slug).await?),
            None => None,
        };
        let genre_ids = match &input.genre {
            Some(slugs) => Some(resolve_slugs(&self.genres, slugs).await?),
            None => None,
        };

        let changes = TitleChanges {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        };
        self.titles.update(id, &changes).await?;
        self.titles
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TitleNotFound)
    }
}

// ── DeleteTitle ──────────────────────────────────────────────────────────────

pub struct DeleteTitleUseCase<T: TitleRepository> {
    pub titles: T,
}

impl<T: TitleRepository> DeleteTitleUseCase<T> {
    pub async fn execute(&self, actor: &Actor, id: i64) -> Result<(), ApiError> {
        authorize(actor, Resource::Title, Action::Delete)?;
        if !self.titles.delete(id).await? {
            return Err(ApiError::TitleNotFound);
        }
        Ok(())
    }
}
