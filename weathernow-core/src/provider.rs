use crate::{
    Config,
    error::Result,
    model::{Coordinates, ForecastSeries, InstantConditions},
    provider::openmeteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

/// A source of current conditions and hourly forecasts for a point.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_instant_conditions(&self, at: Coordinates) -> Result<InstantConditions>;

    async fn fetch_forecast_series(&self, at: Coordinates) -> Result<ForecastSeries>;
}

/// Construct the provider described by config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenMeteoProvider::with_base_url(config.api_base_url()))
}
