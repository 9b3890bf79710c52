use std::path::PathBuf;

use reqwest::StatusCode;

/// Failure to turn a (country, city) pair into exactly one row.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No city named '{city}' in '{country}'")]
    NotFound { country: String, city: String },

    #[error("City '{city}' in '{country}' is ambiguous: {matches} rows match")]
    Ambiguous {
        country: String,
        city: String,
        matches: usize,
    },
}

/// Everything that can abort building a report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to load city dataset {}", .path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse city dataset")]
    DatasetFormat(#[from] csv::Error),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Failed to reach weather provider ({endpoint})")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weather provider ({endpoint}) answered with status {status}: {body}")]
    HttpStatus {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Malformed response from weather provider ({endpoint}): {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },

    #[error("No time zone found at ({latitude}, {longitude})")]
    TimezoneResolution { latitude: f64, longitude: f64 },
}

impl Error {
    /// True for the transport-level failures: unreachable host or non-2xx status.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::HttpStatus { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
