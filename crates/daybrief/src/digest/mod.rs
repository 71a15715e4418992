//! Digest composition and delivery.
//!
//! A [`Digest`] is the one-shot payload for a single run: the fetched
//! sections, composed into HTML and plain-text bodies by
//! [`DigestGenerator`] and sent by [`EmailSender`]. Once sent, it is
//! discarded - there is no cross-run state.

mod email;
mod generator;

pub use email::EmailSender;
pub use generator::DigestGenerator;

use crate::sources::{Headline, TaskAgenda, WeatherReport};

/// Fixed subject line for the daily email.
pub const DIGEST_SUBJECT: &str = "Your Morning Update 🚀";

/// The three digest sections for a single run.
///
/// Each field is `None` when that section's fetch failed and the run is in
/// partial-delivery mode; the generator renders an "unavailable" note in its
/// place. In the default strict mode every field is present.
#[derive(Debug, Clone, Default)]
pub struct Digest {
    /// News headlines, in API order. An empty list is valid ("no headlines").
    pub headlines: Option<Vec<Headline>>,
    /// Current weather conditions.
    pub weather: Option<WeatherReport>,
    /// Open tasks grouped by due date. An empty agenda is valid.
    pub agenda: Option<TaskAgenda>,
}
