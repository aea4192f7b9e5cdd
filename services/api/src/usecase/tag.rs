//! Category and genre use cases. Both kinds share rules; the repository
//! reports which kind it stores.

use yamdb_domain::pagination::{Page, PageRequest};

use crate::domain::policy::{Action, Actor, Resource, authorize};
use crate::domain::repository::TagRepository;
use crate::domain::types::{TAG_NAME_MAX_LEN, Tag, TagKind, validate_max_chars, validate_slug};
use crate::error::{ApiError, FieldErrors};

fn resource(kind: TagKind) -> Resource {
    match kind {
        TagKind::Category => Resource::Category,
        TagKind::Genre => Resource::Genre,
    }
}

pub fn not_found(kind: TagKind) -> ApiError {
    match kind {
        TagKind::Category => ApiError::CategoryNotFound,
        TagKind::Genre => ApiError::GenreNotFound,
    }
}

pub struct ListTagsUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> ListTagsUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Tag>, ApiError> {
        authorize(actor, resource(self.repo.kind()), Action::List)?;
        self.repo.list(search, page.clamped()).await
    }
}

pub struct CreateTagInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

pub struct CreateTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> CreateTagUseCase<R> {
    pub async fn execute(&self, actor: &Actor, input: CreateTagInput) -> Result<Tag, ApiError> {
        authorize(actor, resource(self.repo.kind()), Action::Create)?;

        let mut errors = FieldErrors::new();
        let name = errors.require("name", input.name);
        let slug = errors.require("slug", input.slug);
        if let Some(name) = &name {
            errors.check("name", validate_max_chars(name, TAG_NAME_MAX_LEN));
        }
        if let Some(slug) = &slug {
            errors.check("slug", validate_slug(slug));
        }
        let (Some(name), Some(slug)) = (name, slug) else {
            return Err(ApiError::Validation(errors));
        };
        errors.into_result()?;

        if self.repo.find_by_slug(&slug).await?.is_some() {
            return Err(ApiError::SlugAlreadyExists);
        }
        self.repo.create(&name, &slug).await
    }
}

pub struct DeleteTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> DeleteTagUseCase<R> {
    pub async fn execute(&self, actor: &Actor, slug: &str) -> Result<(), ApiError> {
        let kind = self.repo.kind();
        authorize(actor, resource(kind), Action::Delete)?;
        if !self.repo.delete_by_slug(slug).await? {
            return Err(not_found(kind));
        }
        Ok(())
    }
}
