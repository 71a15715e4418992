//! End-to-end pipeline tests: fetch from mock APIs, apply the failure
//! policy, compose the email bodies.

use chrono::{Duration, TimeZone, Utc};
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daybrief::{DigestConfig, Pipeline};

// =============================================================================
// Fixtures
// =============================================================================

fn test_config() -> DigestConfig {
    DigestConfig {
        news_api_key: "news-key-secret".to_string(),
        weather_api_key: "weather-key-secret".to_string(),
        todoist_api_key: "todoist-key-secret".to_string(),
        email_sender: "sender@example.com".to_string(),
        email_password: "smtp-password-secret".to_string(),
        to_email: "sender@example.com".to_string(),
        city: "Testville".to_string(),
        country: "XX".to_string(),
        news_categories: "technology".to_string(),
        smtp_host: "localhost".to_string(),
        smtp_port: 2525,
    }
}

const NEWS_FIXTURE: &str = r#"{
    "pagination": {"limit": 3, "offset": 0, "count": 1, "total": 1},
    "data": [
        {
            "title": "Headline A",
            "description": "Something happened",
            "url": "https://news.example.com/a",
            "source": "example"
        }
    ]
}"#;

const WEATHER_FIXTURE: &str = r#"{
    "count": 1,
    "data": [
        {
            "city_name": "Testville",
            "country_code": "XX",
            "temp": 22.0,
            "weather": {"icon": "c01d", "code": 800, "description": "Clear"}
        }
    ]
}"#;

/// Todoist payload with one task due today and one due tomorrow, relative
/// to the pipeline's run date.
fn todoist_fixture() -> String {
    let today = Utc::now().date_naive();
    let tomorrow = today + Duration::days(1);
    format!(
        r#"[
            {{"id": "1", "content": "Buy milk", "due": {{"date": "{today}"}}}},
            {{"id": "2", "content": "Dentist", "due": {{"date": "{tomorrow}"}}}}
        ]"#
    )
}

/// Mount success responses for all three APIs on one mock server.
async fn mount_all_sections(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(NEWS_FIXTURE, "application/json"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(WEATHER_FIXTURE, "application/json"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(todoist_fixture(), "application/json"),
        )
        .mount(server)
        .await;
}

fn pipeline_against(server: &MockServer, allow_partial: bool) -> Pipeline {
    Pipeline::new(test_config(), allow_partial)
        .with_news_base_url(&server.uri())
        .with_weather_base_url(&server.uri())
        .with_tasks_base_url(&server.uri())
}

// =============================================================================
// Collection and composition
// =============================================================================

#[tokio::test]
async fn collect_fetches_all_sections() {
    let server = MockServer::start().await;
    mount_all_sections(&server).await;

    let pipeline = pipeline_against(&server, false);
    let (digest, report) = pipeline.collect().await.unwrap();

    assert_eq!(report.headlines, 1);
    assert!(report.weather_ok);
    assert_eq!(report.tasks_today, 1);
    assert_eq!(report.tasks_tomorrow, 1);
    assert!(report.skipped.is_empty());

    assert_eq!(digest.headlines.as_ref().unwrap()[0].title, "Headline A");
    assert_eq!(digest.weather.as_ref().unwrap().city, "Testville");
    assert_eq!(digest.agenda.as_ref().unwrap().today[0].content, "Buy milk");
}

#[tokio::test]
async fn composed_body_has_sections_in_fixed_order() {
    let server = MockServer::start().await;
    mount_all_sections(&server).await;

    let pipeline = pipeline_against(&server, false);
    let (digest, _) = pipeline.collect().await.unwrap();

    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap();
    let (html, text) = Pipeline::compose(&digest, generated_at);

    for body in [&html, &text] {
        let news = body.find("Headline A").unwrap();
        let weather = body.find("Testville").unwrap();
        let tasks = body.find("Buy milk").unwrap();
        assert!(news < weather, "news must precede weather");
        assert!(weather < tasks, "weather must precede tasks");
    }
}

#[tokio::test]
async fn composition_is_byte_identical_across_runs() {
    let server = MockServer::start().await;
    mount_all_sections(&server).await;

    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap();

    let (first_digest, _) = pipeline_against(&server, false).collect().await.unwrap();
    let first = Pipeline::compose(&first_digest, generated_at);

    let (second_digest, _) = pipeline_against(&server, false).collect().await.unwrap();
    let second = Pipeline::compose(&second_digest, generated_at);

    assert_eq!(first.0, second.0, "HTML bodies must match");
    assert_eq!(first.1, second.1, "text bodies must match");
}

#[tokio::test]
async fn composed_body_never_contains_secrets() {
    let server = MockServer::start().await;
    mount_all_sections(&server).await;

    let pipeline = pipeline_against(&server, false);
    let (digest, _) = pipeline.collect().await.unwrap();
    let (html, text) = Pipeline::compose(&digest, Utc::now());

    for secret in [
        "news-key-secret",
        "weather-key-secret",
        "todoist-key-secret",
        "smtp-password-secret",
    ] {
        assert!(!html.contains(secret), "HTML body leaked {secret}");
        assert!(!text.contains(secret), "text body leaked {secret}");
    }
}

// =============================================================================
// Failure policy
// =============================================================================

#[tokio::test]
async fn strict_mode_fails_on_any_section_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(NEWS_FIXTURE, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(&server)
        .await;

    let err = pipeline_against(&server, false).collect().await.unwrap_err();
    assert!(err.to_string().contains("weather"), "got: {err:#}");
}

#[tokio::test]
async fn partial_mode_drops_failed_section_and_proceeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(NEWS_FIXTURE, "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/current"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(todoist_fixture(), "application/json"),
        )
        .mount(&server)
        .await;

    let (digest, report) = pipeline_against(&server, true).collect().await.unwrap();

    assert!(digest.weather.is_none());
    assert!(digest.headlines.is_some());
    assert!(digest.agenda.is_some());
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].starts_with("weather:"));

    let (html, _) = Pipeline::compose(&digest, Utc::now());
    assert!(html.contains("Weather information is unavailable."));
    assert!(html.contains("Headline A"));
}

#[tokio::test]
async fn partial_mode_fails_when_every_section_fails() {
    let server = MockServer::start().await;
    for route in ["/news", "/current", "/tasks"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;
    }

    let err = pipeline_against(&server, true).collect().await.unwrap_err();
    assert!(
        err.to_string().contains("all sections failed"),
        "got: {err:#}"
    );
}

// =============================================================================
// Configuration loading
// =============================================================================

const ALL_ENV_VARS: [&str; 7] = [
    "NEWS_API_KEY",
    "WEATHER_API_KEY",
    "WEATHERBIT_KEY",
    "TODOIST_API_KEY",
    "EMAIL_SENDER",
    "EMAIL_PASSWORD",
    "DIGEST_TO_EMAIL",
];

fn clear_env() {
    for var in ALL_ENV_VARS {
        std::env::remove_var(var);
    }
}

fn set_required_env() {
    std::env::set_var("NEWS_API_KEY", "n");
    std::env::set_var("WEATHER_API_KEY", "w");
    std::env::set_var("TODOIST_API_KEY", "t");
    std::env::set_var("EMAIL_SENDER", "sender@example.com");
    std::env::set_var("EMAIL_PASSWORD", "p");
}

#[test]
#[serial]
fn missing_credential_fails_before_any_network_call() {
    clear_env();
    set_required_env();
    std::env::remove_var("TODOIST_API_KEY");

    let err = DigestConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("TODOIST_API_KEY"));
    clear_env();
}

#[test]
#[serial]
fn weatherbit_key_is_accepted_as_alias() {
    clear_env();
    set_required_env();
    std::env::remove_var("WEATHER_API_KEY");
    std::env::set_var("WEATHERBIT_KEY", "legacy-key");

    let config = DigestConfig::from_env().unwrap();
    assert_eq!(config.weather_api_key, "legacy-key");
    clear_env();
}

#[test]
#[serial]
fn recipient_defaults_to_sender() {
    clear_env();
    set_required_env();

    let config = DigestConfig::from_env().unwrap();
    assert_eq!(config.to_email, "sender@example.com");

    std::env::set_var("DIGEST_TO_EMAIL", "other@example.com");
    let config = DigestConfig::from_env().unwrap();
    assert_eq!(config.to_email, "other@example.com");
    clear_env();
}
