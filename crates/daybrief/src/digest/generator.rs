//! Digest content generator.
//!
//! Builds the HTML and plain-text email bodies from fetched sections.
//! Composition is a pure function of `(Digest, generated_at)`: identical
//! inputs produce byte-identical output.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::Digest;
use crate::sources::{Headline, TaskAgenda, TaskItem};

/// Decorative bullets for task lines, rotated by list position.
const TASK_EMOJIS: [&str; 10] = ["🚀", "💻", "📚", "🎨", "🔧", "📝", "🔬", "🏋️", "🧘", "🎵"];

/// Generates digest email content from fetched sections.
pub struct DigestGenerator;

impl DigestGenerator {
    /// Generate the HTML email body.
    #[must_use]
    pub fn generate_html(digest: &Digest, generated_at: DateTime<Utc>) -> String {
        let date_str = generated_at.format("%A, %B %d, %Y").to_string();

        let news_html = match &digest.headlines {
            Some(headlines) => Self::build_news_html(headlines),
            None => r#"<p class="muted">News is unavailable today.</p>"#.to_string(),
        };

        let weather_html = match &digest.weather {
            Some(report) => format!("<p>{}</p>", html_escape(&report.summary())),
            None => r#"<p class="muted">Weather information is unavailable.</p>"#.to_string(),
        };

        let tasks_html = match &digest.agenda {
            Some(agenda) => Self::build_tasks_html(agenda),
            None => r#"<p class="muted">Task list is unavailable.</p>"#.to_string(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Your Daily Update</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 600px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }}
        h1 {{
            color: #2c3e50;
            border-bottom: 2px solid #3498db;
            padding-bottom: 10px;
            text-align: center;
        }}
        h2 {{
            color: #2980b9;
            text-align: center;
        }}
        h3 {{
            color: #34495e;
            margin-bottom: 10px;
        }}
        .date {{
            text-align: center;
            color: #7f8c8d;
            margin-top: 0;
        }}
        .section {{
            background-color: #ffffff;
            border-radius: 10px;
            padding: 20px;
            margin-bottom: 20px;
            box-shadow: 0 2px 5px rgba(0,0,0,0.1);
        }}
        .muted {{
            color: #7f8c8d;
            font-style: italic;
        }}
        .news-item {{
            margin-bottom: 15px;
            border-left: 3px solid #3498db;
            padding-left: 10px;
        }}
        .news-item h3 {{
            margin-bottom: 5px;
        }}
        .news-item p {{
            margin-top: 0;
        }}
        .news-item a {{
            color: #3498db;
            text-decoration: none;
        }}
        .news-item a:hover {{
            text-decoration: underline;
        }}
        .task-group {{
            margin-bottom: 20px;
            padding: 15px;
            border-radius: 5px;
        }}
        .today {{
            background-color: #e8f4f8;
        }}
        .tomorrow {{
            background-color: #fff4e6;
        }}
        ul {{
            list-style-type: none;
            padding-left: 0;
        }}
        li {{
            margin-bottom: 10px;
            font-size: 16px;
        }}
        .progress-bar {{
            background-color: #e0e0e0;
            border-radius: 10px;
            height: 20px;
            width: 100%;
            margin-bottom: 15px;
            position: relative;
            overflow: hidden;
        }}
        .progress-bar::before {{
            content: '';
            display: block;
            height: 100%;
            width: var(--progress);
            background-color: #4caf50;
        }}
        .progress-bar span {{
            position: absolute;
            top: 50%;
            left: 50%;
            transform: translate(-50%, -50%);
            color: #333;
            font-weight: bold;
        }}
    </style>
</head>
<body>
    <h1>🌟 Your Daily Launchpad 🚀</h1>
    <p class="date">{date_str}</p>

    <div class="section">
        <h2>📰 News Flash</h2>
        {news_html}
    </div>

    <div class="section">
        <h2>🌤️ Weather Update</h2>
        {weather_html}
    </div>

    <div class="section">
        <h2>📝 Mission Control</h2>
        {tasks_html}
    </div>
</body>
</html>
"#
        )
    }

    /// Generate the plain-text alternative body.
    #[must_use]
    pub fn generate_text(digest: &Digest, generated_at: DateTime<Utc>) -> String {
        let date_str = generated_at.format("%A, %B %d, %Y").to_string();
        let mut body = String::new();

        let _ = writeln!(body, "Good morning! Here's your update:");
        let _ = writeln!(body, "{date_str}");
        let _ = writeln!(body);

        let _ = writeln!(body, "---- NEWS ----");
        match &digest.headlines {
            Some(headlines) if headlines.is_empty() => {
                let _ = writeln!(body, "No news found.");
            }
            Some(headlines) => {
                for (i, headline) in headlines.iter().enumerate() {
                    if i > 0 {
                        let _ = writeln!(body);
                    }
                    let _ = writeln!(body, "Title: {}", headline.title);
                    let _ = writeln!(body, "Description: {}", headline.summary);
                    let _ = writeln!(body, "URL: {}", headline.url);
                }
            }
            None => {
                let _ = writeln!(body, "News is unavailable today.");
            }
        }
        let _ = writeln!(body);

        let _ = writeln!(body, "---- WEATHER ----");
        match &digest.weather {
            Some(report) => {
                let _ = writeln!(body, "{}", report.summary());
            }
            None => {
                let _ = writeln!(body, "Weather information is unavailable.");
            }
        }
        let _ = writeln!(body);

        let _ = writeln!(body, "---- TO-DO LIST ----");
        match &digest.agenda {
            Some(agenda) if agenda.is_empty() => {
                let _ = writeln!(body, "No open tasks.");
            }
            Some(agenda) => {
                let mut position = 0;
                if !agenda.today.is_empty() {
                    let _ = writeln!(
                        body,
                        "Today's Mission ({}):",
                        task_count_label(agenda.today.len())
                    );
                    for task in &agenda.today {
                        let _ = writeln!(body, "  {} {}", task_emoji(position), task.content);
                        position += 1;
                    }
                }
                if !agenda.tomorrow.is_empty() {
                    let _ = writeln!(body, "On the Horizon:");
                    for task in &agenda.tomorrow {
                        let _ = writeln!(body, "  {} {}", task_emoji(position), task.content);
                        position += 1;
                    }
                }
            }
            None => {
                let _ = writeln!(body, "Task list is unavailable.");
            }
        }

        body
    }

    fn build_news_html(headlines: &[Headline]) -> String {
        if headlines.is_empty() {
            return r#"<p class="muted">No news found.</p>"#.to_string();
        }

        let mut html = String::new();
        for headline in headlines {
            let _ = write!(
                html,
                r#"
        <div class="news-item">
            <h3><a href="{url}">{title}</a></h3>
            <p>{summary}</p>
        </div>
"#,
                url = html_escape(&headline.url),
                title = html_escape(&headline.title),
                summary = html_escape(&headline.summary),
            );
        }
        html
    }

    fn build_tasks_html(agenda: &TaskAgenda) -> String {
        if agenda.is_empty() {
            return r#"<p class="muted">No open tasks.</p>"#.to_string();
        }

        let mut html = String::new();
        let mut position = 0;

        if !agenda.today.is_empty() {
            // One open task fills 10% of the bar, capped at full.
            let progress = (agenda.today.len() * 10).min(100);
            let _ = write!(
                html,
                r#"
        <div class="task-group today">
            <h3>Today's Mission</h3>
            <div class="progress-bar" style="--progress: {progress}%;">
                <span>{label}</span>
            </div>
            <ul>"#,
                progress = progress,
                label = task_count_label(agenda.today.len()),
            );
            Self::append_task_items(&mut html, &agenda.today, &mut position);
            let _ = write!(html, "</ul>\n        </div>\n");
        }

        if !agenda.tomorrow.is_empty() {
            let _ = write!(
                html,
                r#"
        <div class="task-group tomorrow">
            <h3>On the Horizon</h3>
            <ul>"#
            );
            Self::append_task_items(&mut html, &agenda.tomorrow, &mut position);
            let _ = write!(html, "</ul>\n        </div>\n");
        }

        html
    }

    fn append_task_items(html: &mut String, tasks: &[TaskItem], position: &mut usize) {
        for task in tasks {
            let _ = write!(
                html,
                "\n                <li>{} {}</li>",
                task_emoji(*position),
                html_escape(&task.content)
            );
            *position += 1;
        }
        let _ = write!(html, "\n            ");
    }
}

fn task_count_label(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}

/// Pick the bullet for the task at `position`.
///
/// A fixed rotation replaces the unseeded random choice the job once used,
/// so repeated composition of the same digest is byte-identical.
fn task_emoji(position: usize) -> &'static str {
    TASK_EMOJIS[position % TASK_EMOJIS.len()]
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
