//! Coordinates to the location's current UTC offset.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;
use tzf_rs::DefaultFinder;

use crate::{
    error::{Error, Result},
    model::Coordinates,
};

/// Finds the IANA zone name whose boundary contains a point.
pub trait ZoneFinder {
    fn zone_name(&self, at: Coordinates) -> Option<String>;
}

impl ZoneFinder for DefaultFinder {
    fn zone_name(&self, at: Coordinates) -> Option<String> {
        let name = self.get_tz_name(at.longitude, at.latitude);
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Resolves a location's UTC offset, DST included, at a given instant.
pub struct LocalTimeResolver<F = DefaultFinder> {
    finder: F,
}

impl LocalTimeResolver<DefaultFinder> {
    /// Builds the resolver over the boundary dataset bundled with `tzf-rs`.
    pub fn new() -> Self {
        Self::with_finder(DefaultFinder::new())
    }
}

impl Default for LocalTimeResolver<DefaultFinder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ZoneFinder> LocalTimeResolver<F> {
    pub fn with_finder(finder: F) -> Self {
        Self { finder }
    }

    /// The zone containing `at`.
    pub fn zone_at(&self, at: Coordinates) -> Result<Tz> {
        let unresolved = || Error::TimezoneResolution {
            latitude: at.latitude,
            longitude: at.longitude,
        };

        let name = self.finder.zone_name(at).ok_or_else(unresolved)?;
        let zone = name.parse::<Tz>().map_err(|_| unresolved())?;

        info!(%at, zone = %zone.name(), "resolved time zone");
        Ok(zone)
    }

    /// Offset from UTC at `at`, evaluated at `instant`.
    pub fn utc_offset_at(&self, at: Coordinates, instant: DateTime<Utc>) -> Result<FixedOffset> {
        let zone = self.zone_at(at)?;
        Ok(zone.offset_from_utc_datetime(&instant.naive_utc()).fix())
    }

    /// Offset from UTC at `at`, right now. Recomputed on every call.
    pub fn utc_offset(&self, at: Coordinates) -> Result<FixedOffset> {
        self.utc_offset_at(at, Utc::now())
    }
}
