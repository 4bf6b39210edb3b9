use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::models::SupportRequest;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("SMTP is not configured, message not delivered")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Clone)]
enum Delivery {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    /// No SMTP server configured: messages are only logged.
    Log,
}

/// Plain-text mailer for support and account messages.
#[derive(Clone)]
pub struct EmailService {
    delivery: Delivery,
    support_address: String,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let delivery = match self.delivery {
            Delivery::Smtp { .. } => "smtp",
            Delivery::Log => "log",
        };
        f.debug_struct("EmailService")
            .field("delivery", &delivery)
            .field("support_address", &self.support_address)
            .finish()
    }
}

impl EmailService {
    pub fn new(smtp: Option<&SmtpConfig>, support_address: &str) -> Result<Self, EmailError> {
        let delivery = match smtp {
            Some(config) => {
                let from = parse_mailbox(&config.from)?;
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                    .port(config.port);
                if !config.username.is_empty() {
                    builder = builder.credentials(Credentials::new(
                        config.username.clone(),
                        config.password.clone(),
                    ));
                }
                Delivery::Smtp {
                    transport: builder.build(),
                    from,
                }
            }
            None => Delivery::Log,
        };

        Ok(Self {
            delivery,
            support_address: support_address.to_string(),
        })
    }

    /// Mailer that never opens a connection.
    pub fn log_only(support_address: &str) -> Self {
        Self {
            delivery: Delivery::Log,
            support_address: support_address.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.delivery, Delivery::Smtp { .. })
    }

    pub async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let to = parse_mailbox(&email.to)?;

        match &self.delivery {
            Delivery::Smtp { transport, from } => {
                let mut builder = Message::builder()
                    .from(from.clone())
                    .to(to)
                    .subject(email.subject.as_str())
                    .header(ContentType::TEXT_PLAIN);
                if let Some(reply_to) = &email.reply_to {
                    builder = builder.reply_to(parse_mailbox(reply_to)?);
                }
                let message = builder.body(email.body)?;
                transport.send(message).await?;
                tracing::info!(subject = %email.subject, "email sent");
            }
            Delivery::Log => {
                tracing::info!(
                    to = %email.to,
                    subject = %email.subject,
                    "smtp not configured, email logged instead of sent"
                );
            }
        }

        Ok(())
    }

    /// Forward a contact form to the support inbox and confirm receipt to the sender.
    pub async fn send_support_message(&self, request: &SupportRequest) -> Result<(), EmailError> {
        self.send(support_message(&self.support_address, request)).await?;

        if let Err(err) = self.send(support_confirmation(request)).await {
            tracing::warn!(error = %err, "support confirmation not delivered");
        }

        Ok(())
    }

    /// Only delivered over SMTP: a credential that never reaches the user
    /// must not replace their password.
    pub async fn send_temporary_password(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), EmailError> {
        if !self.is_configured() {
            return Err(EmailError::NotConfigured);
        }

        self.send(OutgoingEmail {
            to: email.to_string(),
            reply_to: None,
            subject: "Password recovery - Body Health".to_string(),
            body: format!(
                "Hello {name},\n\n\
                 A password recovery was requested for your account.\n\n\
                 Your temporary password is: {password}\n\n\
                 Sign in with it and change it right away in your profile.\n\n\
                 Body Health Team\n"
            ),
        })
        .await
    }

    /// Check that the SMTP server accepts a connection.
    pub async fn test_connection(&self) -> Result<bool, EmailError> {
        match &self.delivery {
            Delivery::Smtp { transport, .. } => Ok(transport.test_connection().await?),
            Delivery::Log => Ok(false),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidEmailAddress(address.to_string()))
}

pub fn support_message(support_address: &str, request: &SupportRequest) -> OutgoingEmail {
    OutgoingEmail {
        to: support_address.to_string(),
        reply_to: Some(request.email.clone()),
        subject: format!("[BODY HEALTH SUPPORT] {}", request.subject),
        body: format!(
            "New support message:\n\n\
             Name: {}\n\
             Email: {}\n\
             Subject: {}\n\n\
             Message:\n{}\n\n\
             ---\n\
             Body Health\n",
            request.name, request.email, request.subject, request.message
        ),
    }
}

pub fn support_confirmation(request: &SupportRequest) -> OutgoingEmail {
    OutgoingEmail {
        to: request.email.clone(),
        reply_to: None,
        subject: "Message received - Body Health".to_string(),
        body: format!(
            "Hello {},\n\n\
             We received your message and our team will answer within 24 hours.\n\n\
             Thank you for getting in touch!\n\n\
             Body Health Team\n",
            request.name
        ),
    }
}
