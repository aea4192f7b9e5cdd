use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::ValidateEmail;

use yamdb_domain::rating::ScoreTotals;
use yamdb_domain::user::UserRole;

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const NAME_MAX_LEN: usize = 150;
pub const TAG_NAME_MAX_LEN: usize = 256;
pub const SLUG_MAX_LEN: usize = 50;
pub const TITLE_NAME_MAX_LEN: usize = 256;
pub const SCORE_MIN: i16 = 1;
pub const SCORE_MAX: i16 = 10;

/// Reserved for the `/users/me` route.
pub const RESERVED_USERNAME: &str = "me";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
    pub confirmation_code: Option<String>,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Role used for authorization. Superuser and staff flags count as admin.
    pub fn effective_role(&self) -> UserRole {
        if self.is_superuser || self.is_staff {
            UserRole::Admin
        } else {
            self.role
        }
    }
}

/// Category or genre. Both share shape and rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Category,
    Genre,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<Tag>,
    pub genres: Vec<Tag>,
    pub scores: ScoreTotals,
}

impl Title {
    pub fn rating(&self) -> i64 {
        self.scores.rating()
    }
}

/// Title list filters. All conditions are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleFilter {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: i64,
    pub genre_ids: Vec<i64>,
}

/// Partial title update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleChanges {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub genre_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i64,
    pub title_id: i64,
    pub author_id: Uuid,
    /// Author username.
    pub author: String,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub title_id: i64,
    pub author_id: Uuid,
    pub author: String,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    pub author_id: Uuid,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub review_id: i64,
    pub author_id: Uuid,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

// ── Field validation ─────────────────────────────────────────────────────────

/// 1–150 chars of letters, digits and `@.+-_`; `me` is reserved.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username == RESERVED_USERNAME {
        return Err("username \"me\" is reserved");
    }
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        return Err("username must be 1-150 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err("username may contain only letters, digits and @/./+/-/_");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > EMAIL_MAX_LEN || !email.validate_email() {
        return Err("enter a valid email address");
    }
    Ok(())
}

/// Slug: 1–50 chars matching `^[-a-zA-Z0-9_]+$`.
pub fn validate_slug(slug: &str) -> Result<(), &'static str> {
    if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
        return Err("slug must be 1-50 characters");
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err("slug may contain only latin letters, digits, - and _");
    }
    Ok(())
}

pub fn validate_max_chars(value: &str, max: usize) -> Result<(), &'static str> {
    if value.chars().count() > max {
        return Err("value is too long");
    }
    Ok(())
}

pub fn validate_score(score: i64) -> Result<i16, &'static str> {
    if (i64::from(SCORE_MIN)..=i64::from(SCORE_MAX)).contains(&score) {
        Ok(score as i16)
    } else {
        Err("score must be between 1 and 10")
    }
}

/// Release year may not lie in the future.
pub fn validate_year(year: i32) -> Result<(), &'static str> {
    use chrono::Datelike;
    if year > Utc::now().year() {
        return Err("year cannot be in the future");
    }
    Ok(())
}
