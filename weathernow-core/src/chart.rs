//! Display models handed to the presentation layer: the dual-axis forecast chart and the map pin.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Coordinates, ForecastSeries};

pub const TEMPERATURE_AXIS_TITLE: &str = "Temp (°C)";
pub const PRECIPITATION_AXIS_TITLE: &str = "Rain (mm)";

/// Format of the label attached to the "now" marker.
pub const NOW_LABEL_FORMAT: &str = "%d %b %Y %H:%M";

/// Vertical clearance of the marker label above the warmest hour, in °C.
const LABEL_HEADROOM_C: f64 = 5.0;

const MAP_ZOOM: u8 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub axis_title: String,
    pub x: Vec<NaiveDateTime>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowMarker {
    pub x: NaiveDateTime,
    pub label: String,
    /// Height of the label on the temperature axis; `None` for an empty series.
    pub label_y: Option<f64>,
}

/// Temperature line on the primary axis, precipitation bars on the secondary one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub temperature: Trace,
    pub precipitation: Trace,
    pub now: NowMarker,
}

impl Chart {
    /// Lay out the forecast against the location's wall clock.
    ///
    /// Every timestamp is shifted by `offset`, and the marker sits at `now` shifted the same way.
    pub fn build(series: &ForecastSeries, offset: FixedOffset, now: DateTime<Utc>) -> Self {
        let shift = Duration::seconds(offset.local_minus_utc() as i64);
        let x: Vec<NaiveDateTime> = series.points.iter().map(|p| p.time + shift).collect();

        let marker_x = now.naive_utc() + shift;

        Self {
            temperature: Trace {
                name: "Temperature °C".to_string(),
                axis_title: TEMPERATURE_AXIS_TITLE.to_string(),
                x: x.clone(),
                y: series.points.iter().map(|p| p.temperature_c).collect(),
            },
            precipitation: Trace {
                name: "Precipitation mm".to_string(),
                axis_title: PRECIPITATION_AXIS_TITLE.to_string(),
                x,
                y: series.points.iter().map(|p| p.precipitation_mm).collect(),
            },
            now: NowMarker {
                x: marker_x,
                label: marker_x.format(NOW_LABEL_FORMAT).to_string(),
                label_y: series.max_temperature().map(|t| t + LABEL_HEADROOM_C),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPin {
    pub at: Coordinates,
    pub label: String,
    pub zoom: u8,
}

impl MapPin {
    pub fn new(at: Coordinates, city: &str, country: &str) -> Self {
        Self {
            at,
            label: format!("{city}, {country}"),
            zoom: MAP_ZOOM,
        }
    }

    /// OpenStreetMap link centred on the pin, with a marker.
    pub fn url(&self) -> String {
        let Coordinates { latitude, longitude } = self.at;
        format!(
            "https://www.openstreetmap.org/?mlat={latitude}&mlon={longitude}#map={}/{latitude}/{longitude}",
            self.zoom
        )
    }
}
