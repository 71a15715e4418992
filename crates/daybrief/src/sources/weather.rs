//! Weatherbit current-conditions client.

use serde::Deserialize;

use super::{scrub, SourceError};

/// Default Weatherbit API endpoint.
const WEATHERBIT_API_BASE: &str = "https://api.weatherbit.io/v2.0";

/// Current-conditions snapshot for the weather section.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Resolved city name as reported by the API.
    pub city: String,
    /// ISO country code.
    pub country: String,
    /// Temperature in degrees Celsius.
    pub temp_c: f64,
    /// Short conditions description ("Clear sky", "Light rain").
    pub description: String,
}

impl WeatherReport {
    /// One-line summary used by both email bodies.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Weather in {}, {}: {}°C, {}.",
            self.city, self.country, self.temp_c, self.description
        )
    }
}

/// Weatherbit `/current` response envelope.
#[derive(Debug, Deserialize)]
struct WeatherbitResponse {
    #[serde(default)]
    data: Vec<WeatherbitObservation>,
}

#[derive(Debug, Deserialize)]
struct WeatherbitObservation {
    city_name: String,
    country_code: String,
    temp: f64,
    weather: WeatherbitConditions,
}

#[derive(Debug, Deserialize)]
struct WeatherbitConditions {
    description: String,
}

/// Client for the Weatherbit current-conditions API.
pub struct WeatherClient {
    api_key: String,
    city: String,
    country: String,
    base_url: String,
    client: reqwest::Client,
}

impl WeatherClient {
    /// Create a new client for the given API key and location.
    pub fn new(api_key: String, city: String, country: String) -> Result<Self, SourceError> {
        Ok(Self {
            api_key,
            city,
            country,
            base_url: WEATHERBIT_API_BASE.to_string(),
            client: super::http_client()?,
        })
    }

    /// Point the client at a different endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch current conditions for the configured location.
    pub async fn fetch(&self) -> Result<WeatherReport, SourceError> {
        let url = format!("{}/current", self.base_url);

        tracing::debug!(city = %self.city, country = %self.country, "Fetching weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("city", self.city.as_str()),
                ("country", self.country.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(scrub)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, body });
        }

        let body = response.text().await.map_err(scrub)?;
        let payload: WeatherbitResponse = serde_json::from_str(&body)?;

        // A valid current-conditions response carries exactly one observation.
        let observation = payload
            .data
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Payload("Weatherbit returned no observations".to_string()))?;

        Ok(WeatherReport {
            city: observation.city_name,
            country: observation.country_code,
            temp_c: observation.temp,
            description: observation.weather.description,
        })
    }
}
