//! The whole dashboard pipeline for one selected city.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    chart::{Chart, MapPin},
    directory::Directory,
    error::Result,
    model::{Coordinates, ForecastSeries, InstantConditions},
    provider::WeatherProvider,
    timezone::{LocalTimeResolver, ZoneFinder},
    wind::CompassPoint,
};

/// A city picked from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub country: String,
    pub city: String,
}

impl Selection {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }
}

/// Everything one render needs.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub selection: Selection,
    pub coordinates: Coordinates,
    pub current: InstantConditions,
    pub wind_from: CompassPoint,
    pub forecast: ForecastSeries,
    /// Offset of the location from UTC when the report was built.
    #[serde(serialize_with = "serialize_offset")]
    pub utc_offset: FixedOffset,
    pub generated_at: DateTime<Utc>,
    pub chart: Chart,
    pub map: MapPin,
}

fn serialize_offset<S: serde::Serializer>(offset: &FixedOffset, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(offset)
}

/// Build the report for `selection`, evaluating "now" at the current instant.
///
/// Fails on the first error; nothing partial is returned.
pub async fn build_report<F: ZoneFinder>(
    directory: &Directory,
    provider: &dyn WeatherProvider,
    resolver: &LocalTimeResolver<F>,
    selection: &Selection,
) -> Result<Report> {
    build_report_at(directory, provider, resolver, selection, Utc::now()).await
}

/// Same as [`build_report`] with an explicit "now".
pub async fn build_report_at<F: ZoneFinder>(
    directory: &Directory,
    provider: &dyn WeatherProvider,
    resolver: &LocalTimeResolver<F>,
    selection: &Selection,
    now: DateTime<Utc>,
) -> Result<Report> {
    let coordinates = directory.coordinates_of(&selection.country, &selection.city)?;

    let current = provider.fetch_instant_conditions(coordinates).await?;
    let forecast = provider.fetch_forecast_series(coordinates).await?;

    let wind_from = CompassPoint::from_bearing(current.wind_direction_deg);
    let utc_offset = resolver.utc_offset_at(coordinates, now)?;

    info!(
        country = %selection.country,
        city = %selection.city,
        hours = forecast.len(),
        offset = %utc_offset,
        "built weather report"
    );

    let chart = Chart::build(&forecast, utc_offset, now);
    let map = MapPin::new(coordinates, &selection.city, &selection.country);

    Ok(Report {
        selection: selection.clone(),
        coordinates,
        current,
        wind_from,
        forecast,
        utc_offset,
        generated_at: now,
        chart,
        map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, model::CityRecord, provider::openmeteo::OpenMeteoProvider};
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Eastern;

    impl ZoneFinder for Eastern {
        fn zone_name(&self, _at: Coordinates) -> Option<String> {
            Some("America/New_York".to_string())
        }
    }

    struct Nowhere;

    impl ZoneFinder for Nowhere {
        fn zone_name(&self, _at: Coordinates) -> Option<String> {
            None
        }
    }

    fn directory() -> Directory {
        Directory::from_records(vec![
            CityRecord {
                name: "New York".into(),
                country: "United States".into(),
                latitude: 40.71,
                longitude: -74.01,
            },
            CityRecord {
                name: "Boston".into(),
                country: "United States".into(),
                latitude: 42.36,
                longitude: -71.06,
            },
        ])
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-07-01T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn mount_open_meteo(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current_weather": {"temperature": 27.3, "windspeed": 4.1, "winddirection": 360}
            })))
            .mount(server)
            .await;

        let start = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let time: Vec<String> = (0..48)
            .map(|h| (start + chrono::Duration::hours(h)).format("%Y-%m-%dT%H:%M").to_string())
            .collect();

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("hourly", "temperature_2m,precipitation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": {
                    "time": time,
                    "temperature_2m": vec![25.0; 48],
                    "precipitation": vec![0.0; 48]
                }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn new_york_report_end_to_end() {
        let server = MockServer::start().await;
        mount_open_meteo(&server).await;

        let provider = OpenMeteoProvider::with_base_url(format!("{}/v1/forecast", server.uri()));
        let resolver = LocalTimeResolver::with_finder(Eastern);
        let selection = Selection::new("United States", "New York");

        let report = build_report_at(&directory(), &provider, &resolver, &selection, now())
            .await
            .unwrap();

        assert_eq!(report.coordinates, Coordinates::new(40.71, -74.01));
        assert_eq!(report.current.temperature_c, 27.3);
        assert_eq!(report.wind_from, CompassPoint::N);
        assert!(report.forecast.len() >= 24);
        assert_eq!(report.utc_offset.local_minus_utc(), -4 * 3600);
        assert_eq!(report.chart.now.label, "01 Jul 2024 11:00");
        assert_eq!(report.chart.temperature.y.len(), report.forecast.len());
        assert_eq!(report.map.label, "New York, United States");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["utc_offset"], "-04:00");
        assert_eq!(json["selection"]["city"], "New York");
    }

    #[tokio::test]
    async fn unknown_city_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let resolver = LocalTimeResolver::with_finder(Eastern);
        let selection = Selection::new("United States", "Gotham");

        let err = build_report_at(&directory(), &provider, &resolver, &selection, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_yields_no_report() {
        let provider = OpenMeteoProvider::with_base_url("http://127.0.0.1:9/v1/forecast");
        let resolver = LocalTimeResolver::with_finder(Eastern);
        let selection = Selection::new("United States", "Boston");

        let result = build_report_at(&directory(), &provider, &resolver, &selection, now()).await;
        let err = result.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn forecast_failure_discards_current_conditions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current_weather": {"temperature": 20.0, "windspeed": 1.0, "winddirection": 90}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("hourly", "temperature_2m,precipitation"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let provider = OpenMeteoProvider::with_base_url(server.uri());
        let resolver = LocalTimeResolver::with_finder(Eastern);
        let selection = Selection::new("United States", "Boston");

        let err = build_report_at(&directory(), &provider, &resolver, &selection, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { .. }));
    }

    #[tokio::test]
    async fn unresolvable_zone_fails_the_report() {
        let server = MockServer::start().await;
        mount_open_meteo(&server).await;

        let provider = OpenMeteoProvider::with_base_url(format!("{}/v1/forecast", server.uri()));
        let resolver = LocalTimeResolver::with_finder(Nowhere);
        let selection = Selection::new("United States", "New York");

        let err = build_report_at(&directory(), &provider, &resolver, &selection, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TimezoneResolution { .. }));
    }
}
