//! Configuration for the digest job.

use anyhow::{Context, Result};

/// Default Gmail SMTP host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default Gmail SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default city for the weather section.
pub const DEFAULT_CITY: &str = "Chennai";

/// Default ISO country code for the weather section.
pub const DEFAULT_COUNTRY: &str = "IN";

/// Default Mediastack category filter.
pub const DEFAULT_NEWS_CATEGORIES: &str = "technology,science,health";

/// Configuration for the digest job, built once at process start.
///
/// All secrets are required up front so a missing credential fails the run
/// before any network call is made.
#[derive(Clone)]
pub struct DigestConfig {
    /// Mediastack API key.
    pub news_api_key: String,
    /// Weatherbit API key.
    pub weather_api_key: String,
    /// Todoist API token.
    pub todoist_api_key: String,
    /// Sender email address (also the SMTP username).
    pub email_sender: String,
    /// SMTP password (Gmail app password).
    pub email_password: String,
    /// Recipient email address.
    pub to_email: String,
    /// City for the weather section.
    pub city: String,
    /// ISO country code for the weather section.
    pub country: String,
    /// Mediastack category filter.
    pub news_categories: String,
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
}

impl DigestConfig {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `NEWS_API_KEY`: Mediastack API key
    /// - `WEATHER_API_KEY`: Weatherbit API key (legacy alias: `WEATHERBIT_KEY`)
    /// - `TODOIST_API_KEY`: Todoist API token
    /// - `EMAIL_SENDER`: Sender address and SMTP username
    /// - `EMAIL_PASSWORD`: SMTP password (Gmail app password)
    ///
    /// # Optional Environment Variables
    /// - `DIGEST_TO_EMAIL`: Recipient (default: the sender)
    /// - `DIGEST_CITY` / `DIGEST_COUNTRY`: Weather location (default: Chennai, IN)
    /// - `NEWS_CATEGORIES`: Mediastack categories (default: technology,science,health)
    /// - `DIGEST_SMTP_HOST` / `DIGEST_SMTP_PORT`: SMTP relay (default: smtp.gmail.com:587)
    pub fn from_env() -> Result<Self> {
        let news_api_key =
            std::env::var("NEWS_API_KEY").context("NEWS_API_KEY environment variable not set")?;

        // Both secret names were in use historically; accept either.
        let weather_api_key = std::env::var("WEATHER_API_KEY")
            .or_else(|_| std::env::var("WEATHERBIT_KEY"))
            .context("WEATHER_API_KEY (or WEATHERBIT_KEY) environment variable not set")?;

        let todoist_api_key = std::env::var("TODOIST_API_KEY")
            .context("TODOIST_API_KEY environment variable not set")?;

        let email_sender =
            std::env::var("EMAIL_SENDER").context("EMAIL_SENDER environment variable not set")?;

        let email_password = std::env::var("EMAIL_PASSWORD")
            .context("EMAIL_PASSWORD environment variable not set")?;

        let to_email =
            std::env::var("DIGEST_TO_EMAIL").unwrap_or_else(|_| email_sender.clone());

        let city = std::env::var("DIGEST_CITY").unwrap_or_else(|_| DEFAULT_CITY.to_string());
        let country =
            std::env::var("DIGEST_COUNTRY").unwrap_or_else(|_| DEFAULT_COUNTRY.to_string());

        let news_categories = std::env::var("NEWS_CATEGORIES")
            .unwrap_or_else(|_| DEFAULT_NEWS_CATEGORIES.to_string());

        let smtp_host =
            std::env::var("DIGEST_SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());

        let smtp_port = std::env::var("DIGEST_SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Ok(Self {
            news_api_key,
            weather_api_key,
            todoist_api_key,
            email_sender,
            email_password,
            to_email,
            city,
            country,
            news_categories,
            smtp_host,
            smtp_port,
        })
    }
}

// Manual impl: the secret fields must never reach logs.
impl std::fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestConfig")
            .field("news_api_key", &"[REDACTED]")
            .field("weather_api_key", &"[REDACTED]")
            .field("todoist_api_key", &"[REDACTED]")
            .field("email_sender", &self.email_sender)
            .field("email_password", &"[REDACTED]")
            .field("to_email", &self.to_email)
            .field("city", &self.city)
            .field("country", &self.country)
            .field("news_categories", &self.news_categories)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}
