use anyhow::Context as _;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::repository::Mailer;
use crate::error::ApiError;

/// Outbound email transport.
#[derive(Clone)]
pub enum EmailSender {
    /// STARTTLS relay.
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    /// Writes messages to the log. For local development.
    Console { from: String },
}

impl EmailSender {
    pub fn smtp(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
        from: &str,
    ) -> anyhow::Result<Self> {
        let from = from.parse::<Mailbox>().context("parse sender address")?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .context("build SMTP transport")?
            .port(port);
        if let Some((user, password)) = credentials {
            builder = builder.credentials(Credentials::new(user, password));
        }
        Ok(Self::Smtp {
            transport: builder.build(),
            from,
        })
    }

    pub fn console(from: impl Into<String>) -> Self {
        Self::Console { from: from.into() }
    }
}

impl Mailer for EmailSender {
    async fn send(&self, subject: &str, body: &str, to: &str) -> Result<(), ApiError> {
        match self {
            Self::Smtp { transport, from } => {
                let to = to
                    .parse::<Mailbox>()
                    .context("parse recipient address")
                    .map_err(ApiError::Delivery)?;
                let message = Message::builder()
                    .from(from.clone())
                    .to(to)
                    .subject(subject)
                    .header(ContentType::TEXT_PLAIN)
                    .body(body.to_owned())
                    .context("build email")
                    .map_err(ApiError::Delivery)?;
                transport
                    .send(message)
                    .await
                    .context("send email")
                    .map_err(ApiError::Delivery)?;
                Ok(())
            }
            Self::Console { from } => {
                tracing::info!(%from, %to, %subject, %body, "email (console transport)");
                Ok(())
            }
        }
    }
}
