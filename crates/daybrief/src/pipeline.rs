//! Digest pipeline - orchestrates the fetch-compose-send flow.
//!
//! The three source fetches are independent and run concurrently; all of
//! them settle before composition. No fetch is retried within a run - the
//! next scheduled invocation is the retry mechanism.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use crate::config::DigestConfig;
use crate::digest::{Digest, DigestGenerator, EmailSender, DIGEST_SUBJECT};
use crate::sources::{NewsClient, SourceError, TodoistClient, WeatherClient};

/// Result of a single digest run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of headlines in the news section.
    pub headlines: usize,
    /// Whether the weather section was fetched.
    pub weather_ok: bool,
    /// Number of tasks due today.
    pub tasks_today: usize,
    /// Number of tasks due tomorrow.
    pub tasks_tomorrow: usize,
    /// Sections dropped under partial delivery, with their errors.
    pub skipped: Vec<String>,
}

/// Digest pipeline orchestrator.
pub struct Pipeline {
    config: DigestConfig,
    allow_partial: bool,
    news_base_url: Option<String>,
    weather_base_url: Option<String>,
    tasks_base_url: Option<String>,
}

impl Pipeline {
    /// Create a new pipeline.
    ///
    /// With `allow_partial` false (the default for scheduled runs), any
    /// section failure aborts the run before an email is sent. With it set,
    /// a failed section is dropped and rendered as unavailable - unless
    /// every section failed, in which case the run still fails.
    #[must_use]
    pub fn new(config: DigestConfig, allow_partial: bool) -> Self {
        Self {
            config,
            allow_partial,
            news_base_url: None,
            weather_base_url: None,
            tasks_base_url: None,
        }
    }

    /// Point the news client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_news_base_url(mut self, base_url: &str) -> Self {
        self.news_base_url = Some(base_url.to_string());
        self
    }

    /// Point the weather client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_weather_base_url(mut self, base_url: &str) -> Self {
        self.weather_base_url = Some(base_url.to_string());
        self
    }

    /// Point the tasks client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_tasks_base_url(mut self, base_url: &str) -> Self {
        self.tasks_base_url = Some(base_url.to_string());
        self
    }

    /// Fetch all three sections concurrently and apply the failure policy.
    pub async fn collect(&self) -> Result<(Digest, RunReport)> {
        let today = Utc::now().date_naive();

        let mut news_client = NewsClient::new(
            self.config.news_api_key.clone(),
            self.config.news_categories.clone(),
        )?;
        if let Some(url) = &self.news_base_url {
            news_client = news_client.with_base_url(url);
        }

        let mut weather_client = WeatherClient::new(
            self.config.weather_api_key.clone(),
            self.config.city.clone(),
            self.config.country.clone(),
        )?;
        if let Some(url) = &self.weather_base_url {
            weather_client = weather_client.with_base_url(url);
        }

        let mut tasks_client = TodoistClient::new(self.config.todoist_api_key.clone())?;
        if let Some(url) = &self.tasks_base_url {
            tasks_client = tasks_client.with_base_url(url);
        }

        tracing::info!(date = %today, allow_partial = self.allow_partial, "Fetching digest sections");

        // join! rather than try_join!: the partial policy needs every
        // outcome, not just the first error.
        let (news, weather, tasks) = tokio::join!(
            news_client.fetch(today),
            weather_client.fetch(),
            tasks_client.fetch(today),
        );

        let mut digest = Digest::default();
        let mut report = RunReport::default();

        if let Some(headlines) = self.settle("news", news, &mut report)? {
            report.headlines = headlines.len();
            digest.headlines = Some(headlines);
        }

        if let Some(weather) = self.settle("weather", weather, &mut report)? {
            report.weather_ok = true;
            digest.weather = Some(weather);
        }

        if let Some(agenda) = self.settle("tasks", tasks, &mut report)? {
            report.tasks_today = agenda.today.len();
            report.tasks_tomorrow = agenda.tomorrow.len();
            digest.agenda = Some(agenda);
        }

        if digest.headlines.is_none() && digest.weather.is_none() && digest.agenda.is_none() {
            bail!(
                "all sections failed, nothing to send: {}",
                report.skipped.join("; ")
            );
        }

        Ok((digest, report))
    }

    /// Run the full job: fetch, compose, send.
    pub async fn run(&self) -> Result<RunReport> {
        let (digest, report) = self.collect().await?;
        let generated_at = Utc::now();
        let (html, text) = Self::compose(&digest, generated_at);

        let sender = EmailSender::new(self.config.clone());
        sender
            .send(DIGEST_SUBJECT, &html, &text)
            .await
            .context("Failed to deliver the digest email")?;

        Ok(report)
    }

    /// Compose both email bodies from a digest.
    #[must_use]
    pub fn compose(digest: &Digest, generated_at: DateTime<Utc>) -> (String, String) {
        let html = DigestGenerator::generate_html(digest, generated_at);
        let text = DigestGenerator::generate_text(digest, generated_at);
        (html, text)
    }

    /// Apply the failure policy to one section's fetch result.
    ///
    /// Strict mode propagates the error; partial mode logs it, records it in
    /// the report, and drops the section.
    fn settle<T>(
        &self,
        section: &str,
        result: Result<T, SourceError>,
        report: &mut RunReport,
    ) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.allow_partial => {
                tracing::warn!(section, error = %err, "Section fetch failed, dropping it");
                report.skipped.push(format!("{section}: {err}"));
                Ok(None)
            }
            Err(err) => {
                Err(anyhow::Error::new(err).context(format!("Failed to fetch the {section} section")))
            }
        }
    }
}
