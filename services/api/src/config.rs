/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Bearer token lifetime in seconds (default one day).
    pub token_ttl_secs: u64,
    /// Length of emailed confirmation codes. Env var: `CONFIRMATION_CODE_LENGTH`.
    pub confirmation_code_len: usize,
    /// SMTP relay. When `SMTP_HOST` is unset, mail is written to the log.
    pub smtp: Option<SmtpConfig>,
    /// Sender address. Env var: `MAIL_FROM`.
    pub mail_from: String,
}

#[derive(Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Credentials are used only when both user and password are set.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
            confirmation_code_len: std::env::var("CONFIRMATION_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|len| *len > 0)
                .unwrap_or(12),
            smtp: std::env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(587),
                user: std::env::var("SMTP_USER").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
            }),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "noreply@yamdb.local".to_owned()),
        }
    }
}
