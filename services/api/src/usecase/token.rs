use yamdb_auth_types::token::issue_access_token;

use crate::domain::repository::UserRepository;
use crate::error::{ApiError, FieldErrors};

pub struct IssueTokenInput {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

#[derive(Debug)]
pub struct IssueTokenOutput {
    pub token: String,
    pub exp: u64,
}

/// Exchange a confirmation code for a bearer token. Codes are single-use.
pub struct IssueTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
    pub ttl_secs: u64,
}

impl<U: UserRepository> IssueTokenUseCase<U> {
    pub async fn execute(&self, input: IssueTokenInput) -> Result<IssueTokenOutput, ApiError> {
        let mut errors = FieldErrors::new();
        let username = errors.require("username", input.username);
        let code = errors.require("confirmation_code", input.confirmation_code);
        let (Some(username), Some(code)) = (username, code) else {
            return Err(ApiError::Validation(errors));
        };

        let user = self
            .users
            .find_by_username(&username)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        if user.confirmation_code.as_deref() != Some(code.as_str()) {
            return Err(ApiError::InvalidConfirmationCode);
        }

        let (token, exp) = issue_access_token(user.id, self.ttl_secs, &self.jwt_secret)
            .map_err(|e| ApiError::Internal(e.into()))?;
        self.users.set_confirmation_code(user.id, None).await?;

        tracing::info!(user_id = %user.id, "access token issued");
        Ok(IssueTokenOutput { token, exp })
    }
}
