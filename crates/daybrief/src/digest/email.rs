//! Email sender using SMTP with STARTTLS.

use anyhow::{Context, Result};
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::DigestConfig;

/// Email sender for the daily digest.
pub struct EmailSender {
    config: DigestConfig,
}

impl EmailSender {
    /// Create a new email sender with the given configuration.
    #[must_use]
    pub const fn new(config: DigestConfig) -> Self {
        Self { config }
    }

    /// Send an email with HTML and plain-text content.
    pub async fn send(&self, subject: &str, html_body: &str, text_body: &str) -> Result<()> {
        let from: Mailbox = self
            .config
            .email_sender
            .parse()
            .context("Invalid sender email address")?;

        let to: Mailbox = self
            .config
            .to_email
            .parse()
            .context("Invalid recipient email address")?;

        // Build multipart message with both HTML and plain text
        let email = Message::builder()
            .from(from)
            .to(to)
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
            )
            .context("Failed to build email message")?;

        let creds = Credentials::new(
            self.config.email_sender.clone(),
            self.config.email_password.clone(),
        );

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .context("Failed to create SMTP transport")?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build();

        mailer
            .send(email)
            .await
            .context("Failed to send email via SMTP")?;

        tracing::info!(
            to = %self.config.to_email,
            subject = subject,
            "Email sent successfully"
        );

        Ok(())
    }

    /// Send a simple test email to verify SMTP configuration.
    pub async fn send_test(&self) -> Result<()> {
        let subject = "Daybrief - Test Email";
        let html_body = r#"
<!DOCTYPE html>
<html>
<head>
    <style>
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; padding: 20px; }
        .container { max-width: 600px; margin: 0 auto; }
        h1 { color: #2c3e50; }
        .success { color: #4caf50; font-weight: bold; }
    </style>
</head>
<body>
    <div class="container">
        <h1>🌟 Daybrief</h1>
        <p class="success">✅ Email configuration is working!</p>
        <p>This is a test email from the daily digest job.</p>
        <p>If you're seeing this, SMTP is configured correctly.</p>
    </div>
</body>
</html>
"#;

        let text_body = r"
Daybrief - Test Email

✅ Email configuration is working!

This is a test email from the daily digest job.
If you're seeing this, SMTP is configured correctly.
";

        self.send(subject, html_body, text_body).await
    }
}
