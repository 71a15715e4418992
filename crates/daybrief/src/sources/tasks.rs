//! Todoist open-tasks client.

use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use super::{scrub, SourceError};

/// Default Todoist REST API endpoint.
const TODOIST_API_BASE: &str = "https://api.todoist.com/rest/v2";

/// One pending task for the to-do section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    /// Task text as entered by the user.
    pub content: String,
    /// Due date, when the task has one.
    pub due: Option<NaiveDate>,
}

/// Open tasks grouped by due date, relative to the run date.
///
/// Tasks due in the past, tasks due after tomorrow, and tasks without a due
/// date are excluded from the digest. Within each group, input order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskAgenda {
    /// Tasks due on the run date.
    pub today: Vec<TaskItem>,
    /// Tasks due the day after.
    pub tomorrow: Vec<TaskItem>,
}

impl TaskAgenda {
    /// Group open tasks around `today`.
    #[must_use]
    pub fn group(tasks: Vec<TaskItem>, today: NaiveDate) -> Self {
        let tomorrow = today + Duration::days(1);
        let mut agenda = Self::default();

        for task in tasks {
            match task.due {
                Some(due) if due == today => agenda.today.push(task),
                Some(due) if due == tomorrow => agenda.tomorrow.push(task),
                _ => {}
            }
        }

        agenda
    }

    /// True when neither group has any tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.tomorrow.is_empty()
    }
}

/// Todoist task as returned by `GET /tasks`.
#[derive(Debug, Deserialize)]
struct TodoistTask {
    content: String,
    due: Option<TodoistDue>,
}

#[derive(Debug, Deserialize)]
struct TodoistDue {
    date: String,
}

/// Client for the Todoist REST API.
pub struct TodoistClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TodoistClient {
    /// Create a new client for the given API token.
    pub fn new(api_key: String) -> Result<Self, SourceError> {
        Ok(Self {
            api_key,
            base_url: TODOIST_API_BASE.to_string(),
            client: super::http_client()?,
        })
    }

    /// Point the client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch all open tasks and group them around `today`.
    ///
    /// Zero open tasks is valid content, not a failure.
    pub async fn fetch(&self, today: NaiveDate) -> Result<TaskAgenda, SourceError> {
        let url = format!("{}/tasks", self.base_url);

        tracing::debug!("Fetching open tasks");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(scrub)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, body });
        }

        let body = response.text().await.map_err(scrub)?;
        let tasks: Vec<TodoistTask> = serde_json::from_str(&body)?;

        let items = tasks
            .into_iter()
            .map(|task| TaskItem {
                content: task.content,
                // The `date` field is "YYYY-MM-DD", with a time suffix for
                // timed tasks; the first ten characters are always the date.
                due: task
                    .due
                    .and_then(|due| parse_due_date(&due.date)),
            })
            .collect();

        Ok(TaskAgenda::group(items, today))
    }
}

fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
