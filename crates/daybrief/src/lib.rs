//! Daybrief - a once-a-day digest job.
//!
//! This crate provides:
//! - Source clients for news (Mediastack), weather (Weatherbit), and open
//!   tasks (Todoist)
//! - Digest composition into HTML and plain-text email bodies
//! - Delivery over authenticated SMTP with STARTTLS
//! - A pipeline that fetches the three sections concurrently, applies the
//!   configured failure policy, and sends one email per run

pub mod config;
pub mod digest;
pub mod pipeline;
pub mod sources;

// Re-export main types
pub use config::DigestConfig;
pub use digest::{Digest, DigestGenerator, EmailSender, DIGEST_SUBJECT};
pub use pipeline::{Pipeline, RunReport};
pub use sources::{Headline, SourceError, TaskAgenda, TaskItem, WeatherReport};
