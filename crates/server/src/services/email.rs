//! Email service for transactional notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Every
//! sender has a multipart text + HTML body. Callers treat delivery as
//! best-effort: a failed send is logged and captured, never propagated into
//! the HTTP response that triggered it.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use atelier_core::{CurrencyCode, Price};

use crate::config::EmailConfig;
use crate::models::order::{Order, OrderItem};

/// Format a stored amount for display in an email body.
fn format_amount(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::USD).display()
}

/// HTML template for the order receipt email.
#[derive(Template)]
#[template(path = "email/order_receipt.html")]
struct OrderReceiptHtml<'a> {
    customer_name: &'a str,
    order_id: i32,
    lines: &'a [ReceiptLine],
    total: String,
}

/// Plain text template for the order receipt email.
#[derive(Template)]
#[template(path = "email/order_receipt.txt")]
struct OrderReceiptText<'a> {
    customer_name: &'a str,
    order_id: i32,
    lines: &'a [ReceiptLine],
    total: String,
}

/// One rendered line of a receipt.
struct ReceiptLine {
    title: String,
    quantity: i32,
    price: String,
}

/// HTML template for the artist approval email.
#[derive(Template)]
#[template(path = "email/artist_approved.html")]
struct ArtistApprovedHtml<'a> {
    name: &'a str,
    portal_url: &'a str,
}

/// Plain text template for the artist approval email.
#[derive(Template)]
#[template(path = "email/artist_approved.txt")]
struct ArtistApprovedText<'a> {
    name: &'a str,
    portal_url: &'a str,
}

/// HTML template for the artist rejection email.
#[derive(Template)]
#[template(path = "email/artist_rejected.html")]
struct ArtistRejectedHtml<'a> {
    name: &'a str,
}

/// Plain text template for the artist rejection email.
#[derive(Template)]
#[template(path = "email/artist_rejected.txt")]
struct ArtistRejectedText<'a> {
    name: &'a str,
}

/// HTML template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    reset_url: &'a str,
    valid_hours: i64,
}

/// Plain text template for the password reset email.
#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetText<'a> {
    reset_url: &'a str,
    valid_hours: i64,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailServiceError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    base_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig, base_url: &str) -> Result<Self, EmailServiceError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send the guest checkout receipt.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_order_receipt(
        &self,
        order: &Order,
        items: &[(OrderItem, String)],
    ) -> Result<(), EmailServiceError> {
        let lines: Vec<ReceiptLine> = items
            .iter()
            .map(|(item, title)| ReceiptLine {
                title: title.clone(),
                quantity: item.quantity,
                price: format_amount(item.price),
            })
            .collect();
        let total = format_amount(order.total_amount);

        let html = OrderReceiptHtml {
            customer_name: &order.customer_name,
            order_id: order.id.as_i32(),
            lines: &lines,
            total: total.clone(),
        }
        .render()?;
        let text = OrderReceiptText {
            customer_name: &order.customer_name,
            order_id: order.id.as_i32(),
            lines: &lines,
            total,
        }
        .render()?;

        self.send_multipart_email(
            &order.customer_email,
            &format!("Your Atelier order #{}", order.id),
            &text,
            &html,
        )
        .await
    }

    /// Send the artist approval notification.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_artist_approved(&self, to: &str, name: &str) -> Result<(), EmailServiceError> {
        let portal_url = format!("{}/api/artist/me", self.base_url);
        let html = ArtistApprovedHtml {
            name,
            portal_url: &portal_url,
        }
        .render()?;
        let text = ArtistApprovedText {
            name,
            portal_url: &portal_url,
        }
        .render()?;

        self.send_multipart_email(to, "Your Atelier profile has been approved", &text, &html)
            .await
    }

    /// Send the artist rejection notification.
    ///
    /// The caller pre-fetches contact info before deleting the account.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_artist_rejected(&self, to: &str, name: &str) -> Result<(), EmailServiceError> {
        let html = ArtistRejectedHtml { name }.render()?;
        let text = ArtistRejectedText { name }.render()?;

        self.send_multipart_email(to, "About your Atelier application", &text, &html)
            .await
    }

    /// Send a password reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to render or send.
    pub async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
        valid_hours: i64,
    ) -> Result<(), EmailServiceError> {
        let reset_url = format!("{}/api/auth/password-reset/confirm?token={token}", self.base_url);
        let html = PasswordResetHtml {
            reset_url: &reset_url,
            valid_hours,
        }
        .render()?;
        let text = PasswordResetText {
            reset_url: &reset_url,
            valid_hours,
        }
        .render()?;

        self.send_multipart_email(to, "Reset your Atelier password", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailServiceError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailServiceError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailServiceError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Log and capture a failed best-effort send.
///
/// Email failures never fail the request that triggered them; the committed
/// state stands and the failure goes to the log and Sentry.
pub fn log_send_failure(context: &str, err: &EmailServiceError) {
    sentry::capture_error(err);
    tracing::warn!(error = %err, context = %context, "email delivery failed");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_amount_two_decimal_places() {
        assert_eq!(format_amount(Decimal::from(630)), "$630.00");
        assert_eq!(format_amount(Decimal::from_str("450.5").unwrap()), "$450.50");
    }
}
