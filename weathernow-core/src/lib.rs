//! Core library for the `weathernow` dashboard.
//!
//! This crate defines:
//! - The city directory loaded from the world cities dataset
//! - The Open-Meteo client behind a provider trait
//! - Wind direction labels and local time resolution
//! - The chart and map models, and the pipeline that builds a full report
//!
//! It is used by `weathernow-cli`, but any other front end can render a [`Report`].

pub mod chart;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;
pub mod timezone;
pub mod wind;

pub use chart::{Chart, MapPin};
pub use config::Config;
pub use directory::Directory;
pub use error::{Error, LookupError};
pub use model::{CityRecord, Coordinates, ForecastPoint, ForecastSeries, InstantConditions};
pub use provider::{WeatherProvider, openmeteo::OpenMeteoProvider};
pub use report::{Report, Selection, build_report};
pub use timezone::LocalTimeResolver;
pub use wind::{CompassPoint, classify};
