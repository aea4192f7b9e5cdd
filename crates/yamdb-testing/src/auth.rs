//! Mock auth helpers for integration tests.
//!
//! `MockAuth` signs a real access token with [`TEST_JWT_SECRET`] so actor
//! resolution runs the same bearer validation as production traffic. The
//! user id must exist in the store under test for the token to authenticate.

use uuid::Uuid;
use yamdb_auth_types::token::issue_access_token;

/// Secret the test `AppState` is built with.
pub const TEST_JWT_SECRET: &str = "yamdb-test-secret";

pub struct MockAuth {
    pub user_id: Uuid,
    pub token: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        let (token, _) =
            issue_access_token(user_id, 3600, TEST_JWT_SECRET).expect("sign test token");
        Self { user_id, token }
    }
}
