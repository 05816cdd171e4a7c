use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::{CityInfo, ForecastRequest, ForecastResponse, ForecastSample},
};

use super::ForecastProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Visibility is capped at 10 km by the provider and omitted on some entries.
const MAX_VISIBILITY_M: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: &str) -> Result<Self, FetchError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            http,
        })
    }

    /// Point the provider at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    async fn fetch(&self, place: &str, count: u32) -> Result<ForecastResponse, FetchError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let count = count.to_string();

        tracing::debug!(place, cnt = %count, "requesting OpenWeather forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("cnt", count.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = provider_message(&body);
            tracing::warn!(place, status = status.as_u16(), %message, "OpenWeather forecast request failed");
            return Err(FetchError::Status { status: status.as_u16(), message });
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;
        let response = parsed.into_response()?;

        tracing::info!(
            place,
            city = %response.city.display_name(),
            samples = response.samples.len(),
            "fetched forecast"
        );

        Ok(response)
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, FetchError> {
        let place = request.place.trim();
        if place.is_empty() {
            return Err(FetchError::EmptyPlace);
        }

        self.fetch(place, request.bounded_count()).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<u16>,
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    clouds: Option<OwClouds>,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: i32,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

impl OwForecastResponse {
    fn into_response(self) -> Result<ForecastResponse, FetchError> {
        let city = self.city.into_city()?;

        let mut samples = self
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect::<Result<Vec<_>, _>>()?;
        samples.sort_by_key(|s| s.timestamp);

        Ok(ForecastResponse { samples, city })
    }
}

impl OwCity {
    fn into_city(self) -> Result<CityInfo, FetchError> {
        let timezone = FixedOffset::east_opt(self.timezone).ok_or_else(|| {
            FetchError::Malformed(format!("city timezone offset {} out of range", self.timezone))
        })?;

        Ok(CityInfo {
            sunrise: unix_to_utc(self.sunrise)?,
            sunset: unix_to_utc(self.sunset)?,
            name: self.name,
            country: self.country,
            timezone,
        })
    }
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample, FetchError> {
        let timestamp = unix_to_utc(self.dt)?;
        let weather = self.weather.into_iter().next().ok_or_else(|| {
            FetchError::Malformed(format!("forecast entry at {timestamp} has no weather condition"))
        })?;

        Ok(ForecastSample {
            timestamp,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            visibility: self.visibility.unwrap_or(MAX_VISIBILITY_M),
            wind_speed: self.wind.speed,
            wind_gust: self.wind.gust,
            wind_direction: self.wind.deg,
            cloudiness: self.clouds.map(|c| c.all),
            precipitation_probability: self.pop,
            condition_icon: weather.icon,
            condition_description: weather.description,
        })
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| FetchError::Malformed(format!("timestamp {ts} out of range")))
}

/// The provider's own error text if the body carries one, else the raw body.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
