//! Compass labels for wind bearings.

use serde::{Deserialize, Serialize};

const BUCKET_WIDTH_DEG: f64 = 22.5;

/// The 16 compass points, clockwise from due north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    pub const fn all() -> &'static [CompassPoint; 16] {
        use CompassPoint::*;
        &[N, NNE, NE, ENE, E, ESE, SE, SSE, S, SSW, SW, WSW, W, WNW, NW, NNW]
    }

    /// Bucket a bearing (degrees clockwise from north) into the point it is centred on.
    ///
    /// Each bucket spans 22.5°, half a bucket either side of its point, so
    /// `[-11.25, 11.25)` is north and 360 wraps back to north.
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let bucket = ((bearing_deg + BUCKET_WIDTH_DEG / 2.0) / BUCKET_WIDTH_DEG).floor() as i64;
        Self::all()[bucket.rem_euclid(16) as usize]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "N/NE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "E/NE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "E/SE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "S/SE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "S/SW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "W/SW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "W/NW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "N/NW",
        }
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a wind bearing, e.g. `classify(45.0) == "NE"`.
pub fn classify(bearing_deg: f64) -> &'static str {
    CompassPoint::from_bearing(bearing_deg).label()
}
