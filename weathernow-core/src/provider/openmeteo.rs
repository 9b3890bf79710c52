use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    error::{Error, Result},
    model::{Coordinates, ForecastPoint, ForecastSeries, InstantConditions},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Timestamp layout of the `hourly.time` array.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const CURRENT: &str = "current weather";
const HOURLY: &str = "hourly forecast";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        at: Coordinates,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let latitude = at.latitude.to_string();
        let longitude = at.longitude.to_string();

        let mut query = vec![
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("windspeed_unit", "ms"),
        ];
        query.extend_from_slice(extra);

        debug!(endpoint, url = %self.base_url, %at, "requesting Open-Meteo");

        let res = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|source| Error::Network { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| Error::Network { endpoint, source })?;

        if !status.is_success() {
            return Err(Error::HttpStatus {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current_weather: OmCurrentWeather,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    precipitation: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmHourlyResponse {
    hourly: OmHourly,
}

impl OmHourly {
    /// Zip the parallel arrays into points, keeping provider order.
    fn into_series(self) -> Result<ForecastSeries> {
        let malformed = |reason: String| Error::MalformedResponse {
            endpoint: HOURLY,
            reason,
        };

        let n = self.time.len();
        if self.temperature_2m.len() != n || self.precipitation.len() != n {
            return Err(malformed(format!(
                "hourly arrays differ in length: time={}, temperature_2m={}, precipitation={}",
                n,
                self.temperature_2m.len(),
                self.precipitation.len(),
            )));
        }

        let points = self
            .time
            .iter()
            .zip(self.temperature_2m)
            .zip(self.precipitation)
            .map(|((time, temperature_c), precipitation_mm)| -> Result<ForecastPoint> {
                let time = NaiveDateTime::parse_from_str(time, TIME_FORMAT)
                    .map_err(|e| malformed(format!("bad timestamp '{time}': {e}")))?;

                Ok(ForecastPoint {
                    time,
                    temperature_c,
                    precipitation_mm,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastSeries { points })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_instant_conditions(&self, at: Coordinates) -> Result<InstantConditions> {
        let parsed: OmCurrentResponse = self
            .get_json(CURRENT, at, &[("current_weather", "true")])
            .await?;

        let current = parsed.current_weather;
        Ok(InstantConditions {
            temperature_c: current.temperature,
            wind_speed_mps: current.windspeed,
            wind_direction_deg: current.winddirection,
        })
    }

    async fn fetch_forecast_series(&self, at: Coordinates) -> Result<ForecastSeries> {
        let parsed: OmHourlyResponse = self
            .get_json(HOURLY, at, &[("hourly", "temperature_2m,precipitation")])
            .await?;

        let series = parsed.hourly.into_series()?;
        debug!(points = series.len(), "parsed hourly forecast");
        Ok(series)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
