pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;
pub mod users;

use serde::{Deserialize, Serialize};

use yamdb_domain::pagination::PageRequest;

use crate::domain::types::Tag;

/// `?limit=&offset=` on nested lists.
#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}

/// `?search=&limit=&offset=` on top-level lists.
#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SearchQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}

/// Category or genre as rendered on the wire.
#[derive(Serialize)]
pub struct TagResponse {
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            name: tag.name,
            slug: tag.slug,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}
