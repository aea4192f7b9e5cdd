use chrono::Utc;
use uuid::Uuid;

use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::user::UserRole;

use crate::domain::policy::{Action, Actor, Resource, authorize};
use crate::domain::repository::UserRepository;
use crate::domain::types::{
    NAME_MAX_LEN, User, validate_email, validate_max_chars, validate_username,
};
use crate::error::{ApiError, FieldErrors};

/// Profile fields accepted on create and partial update.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}

fn parse_role(errors: &mut FieldErrors, role: Option<&str>) -> Option<UserRole> {
    let role = role?;
    match role.parse() {
        Ok(role) => Some(role),
        Err(_) => {
            errors.add("role", "role must be one of user, moderator, admin");
            None
        }
    }
}

/// Validate `changes` against `user` (the row being edited, or a blank
/// draft on create) and apply them. Uniqueness excludes `user` itself.
async fn apply_changes<R: UserRepository>(
    repo: &R,
    mut user: User,
    changes: UserChanges,
) -> Result<User, ApiError> {
    let mut errors = FieldErrors::new();

    if let Some(username) = &changes.username {
        errors.check("username", validate_username(username));
        if errors.get("username").is_none() {
            let taken = repo.find_by_username(username).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                errors.add("username", "a user with that username already exists");
            }
        }
    }
    if let Some(email) = &changes.email {
        errors.check("email", validate_email(email));
        if errors.get("email").is_none() {
            let taken = repo.find_by_email(email).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                errors.add("email", "a user with that email already exists");
            }
        }
    }
    if let Some(first_name) = &changes.first_name {
        errors.check("first_name", validate_max_chars(first_name, NAME_MAX_LEN));
    }
    if let Some(last_name) = &changes.last_name {
        errors.check("last_name", validate_max_chars(last_name, NAME_MAX_LEN));
    }
    let role = parse_role(&mut errors, changes.role.as_deref());
    errors.into_result()?;

    if let Some(username) = changes.username {
        user.username = username;
    }
    if let Some(email) = changes.email {
        user.email = email;
    }
    if let Some(first_name) = changes.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = changes.last_name {
        user.last_name = last_name;
    }
    if let Some(bio) = changes.bio {
        user.bio = bio;
    }
    if let Some(role) = role {
        user.role = role;
    }
    user.updated_at = Utc::now();
    Ok(user)
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, ApiError> {
        authorize(actor, Resource::User, Action::List)?;
        self.repo.list(search, page.clamped()).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, actor: &Actor, username: &str) -> Result<User, ApiError> {
        authorize(actor, Resource::User, Action::Retrieve)?;
        self.repo
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

/// Admin-created account. No confirmation code until the user signs up.
pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, actor: &Actor, mut input: UserChanges) -> Result<User, ApiError> {
        authorize(actor, Resource::User, Action::Create)?;

        let mut errors = FieldErrors::new();
        input.username = errors.require("username", input.username);
        input.email = errors.require("email", input.email);
        errors.into_result()?;

        let now = Utc::now();
        let draft = User {
            id: Uuid::now_v7(),
            username: String::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: UserRole::User,
            confirmation_code: None,
            is_superuser: false,
            is_staff: false,
            created_at: now,
            updated_at: now,
        };
        let user = apply_changes(&self.repo, draft, input).await?;
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created by admin");
        Ok(user)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Actor,
        username: &str,
        changes: UserChanges,
    ) -> Result<User, ApiError> {
        authorize(actor, Resource::User, Action::Update)?;
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let previous_role = user.role;
        let user = apply_changes(&self.repo, user, changes).await?;
        self.repo.update_profile(&user).await?;
        if user.role != previous_role {
            tracing::info!(
                user_id = %user.id,
                from = %previous_role,
                to = %user.role,
                "role changed"
            );
        }
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, actor: &Actor, username: &str) -> Result<(), ApiError> {
        authorize(actor, Resource::User, Action::Delete)?;
        if !self.repo.delete_by_username(username).await? {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}

// ── GetMe / UpdateMe ─────────────────────────────────────────────────────────

pub struct GetMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetMeUseCase<R> {
    pub async fn execute(&self, actor: &Actor) -> Result<User, ApiError> {
        authorize(actor, Resource::Me, Action::Retrieve)?;
        let principal = actor.require_principal()?;
        self.repo
            .find_by_id(principal.id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

/// Self-service profile update. `role` is read-only unless the caller is admin.
pub struct UpdateMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateMeUseCase<R> {
    pub async fn execute(&self, actor: &Actor, mut changes: UserChanges) -> Result<User, ApiError> {
        authorize(actor, Resource::Me, Action::Update)?;
        let principal = actor.require_principal()?;
        if !actor.is_admin() {
            changes.role = None;
        }
        let user = self
            .repo
            .find_by_id(principal.id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let user = apply_changes(&self.repo, user, changes).await?;
        self.repo.update_profile(&user).await?;
        Ok(user)
    }
}
