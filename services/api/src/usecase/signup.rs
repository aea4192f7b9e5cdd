use chrono::Utc;
use rand::RngExt;
use uuid::Uuid;

use yamdb_domain::user::UserRole;

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{User, validate_email, validate_username};
use crate::error::{ApiError, FieldErrors};

/// Charset for confirmation codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const CONFIRMATION_SUBJECT: &str = "YaMDb confirmation code";

pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

pub struct SignupInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutput {
    pub username: String,
    pub email: String,
}

pub struct SignupUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub users: U,
    pub mailer: M,
    pub code_len: usize,
}

impl<U, M> SignupUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, ApiError> {
        let mut errors = FieldErrors::new();
        let username = errors.require("username", input.username);
        let email = errors.require("email", input.email);
        let (Some(username), Some(email)) = (username, email) else {
            return Err(ApiError::Validation(errors));
        };

        // 1. Exact (username, email) pair → replay: resend, never duplicate.
        let by_username = self.users.find_by_username(&username).await?;
        if let Some(existing) = by_username.as_ref().filter(|u| u.email == email) {
            let code = match &existing.confirmation_code {
                Some(code) => code.clone(),
                None => {
                    let code = generate_code(self.code_len);
                    self.users
                        .set_confirmation_code(existing.id, Some(&code))
                        .await?;
                    code
                }
            };
            tracing::info!(user_id = %existing.id, "signup replayed, confirmation code resent");
            self.send_code(&email, &code).await?;
            return Ok(SignupOutput { username, email });
        }

        // 2. Field rules and uniqueness against other identities.
        if by_username.is_some() {
            errors.add("username", "a user with that username already exists");
        }
        errors.check("username", validate_username(&username));
        errors.check("email", validate_email(&email));
        if errors.get("email").is_none() && self.users.find_by_email(&email).await?.is_some() {
            errors.add("email", "a user with that email already exists");
        }
        errors.into_result()?;

        // 3. Create the unconfirmed user, then deliver the code.
        let code = generate_code(self.code_len);
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: username.clone(),
            email: email.clone(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: UserRole::User,
            confirmation_code: Some(code.clone()),
            is_superuser: false,
            is_staff: false,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "user signed up");

        self.send_code(&email, &code).await?;
        Ok(SignupOutput { username, email })
    }

    async fn send_code(&self, to: &str, code: &str) -> Result<(), ApiError> {
        let body = format!("Your confirmation code: {code}");
        self.mailer.send(CONFIRMATION_SUBJECT, &body, to).await
    }
}
