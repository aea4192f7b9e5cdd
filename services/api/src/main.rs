use sea_orm::Database;
use tracing::info;

use yamdb_api::config::ApiConfig;
use yamdb_api::infra::mail::EmailSender;
use yamdb_api::router::build_router;
use yamdb_api::state::AppState;
use yamdb_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = match &config.smtp {
        Some(smtp) => EmailSender::smtp(
            &smtp.host,
            smtp.port,
            smtp.credentials(),
            &config.mail_from,
        )
        .expect("invalid SMTP configuration"),
        None => {
            info!("SMTP_HOST not set, confirmation codes go to the log");
            EmailSender::console(config.mail_from.clone())
        }
    };

    let state = AppState {
        db,
        mailer,
        jwt_secret: config.jwt_secret,
        token_ttl_secs: config.token_ttl_secs,
        confirmation_code_len: config.confirmation_code_len,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
