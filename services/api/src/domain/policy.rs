//! Authorization policy.
//!
//! One pure function decides every (actor, resource, action) triple. Role
//! checks run before ownership checks, so moderators and admins may mutate
//! any review or comment.

use uuid::Uuid;

use yamdb_domain::user::UserRole;

use crate::error::ApiError;

/// Authenticated caller, resolved from the bearer token against the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(Principal),
}

impl Actor {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::User(p) => Some(p),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::User(p) if p.role == UserRole::Admin)
    }

    /// Principal of an authenticated actor, `Unauthenticated` otherwise.
    pub fn require_principal(&self) -> Result<&Principal, ApiError> {
        self.principal().ok_or(ApiError::Unauthenticated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_read(self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// Resource being acted on. Owned resources carry their author once known;
/// `None` means the resource has not been loaded yet (a pre-check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Genre,
    Title,
    /// Any user account via the admin endpoints.
    User,
    /// The caller's own account.
    Me,
    Review { author: Option<Uuid> },
    Comment { author: Option<Uuid> },
}

pub fn allow(actor: &Actor, resource: Resource, action: Action) -> bool {
    let principal = match actor {
        Actor::Anonymous => {
            return action.is_read()
                && matches!(
                    resource,
                    Resource::Category
                        | Resource::Genre
                        | Resource::Title
                        | Resource::Review { .. }
                        | Resource::Comment { .. }
                );
        }
        Actor::User(p) => p,
    };

    match resource {
        Resource::Category | Resource::Genre | Resource::Title => {
            action.is_read() || principal.role == UserRole::Admin
        }
        Resource::User => principal.role == UserRole::Admin,
        Resource::Me => matches!(action, Action::Retrieve | Action::Update),
        Resource::Review { author } | Resource::Comment { author } => {
            if action.is_read() || action == Action::Create {
                return true;
            }
            if principal.role.is_staff() {
                return true;
            }
            // Pre-check before the resource is loaded: defer to the owner check.
            author.is_none_or(|a| a == principal.id)
        }
    }
}

/// [`allow`] as a `Result`: anonymous denials are `Unauthenticated`,
/// authenticated ones `Forbidden`.
pub fn authorize(actor: &Actor, resource: Resource, action: Action) -> Result<(), ApiError> {
    if allow(actor, resource, action) {
        return Ok(());
    }
    match actor {
        Actor::Anonymous => Err(ApiError::Unauthenticated),
        Actor::User(_) => Err(ApiError::Forbidden),
    }
}
