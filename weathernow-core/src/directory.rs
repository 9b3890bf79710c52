//! The static city table and the lookups the selectors need.

use std::{collections::BTreeSet, fs::File, io::Read, path::Path};

use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    error::{Error, LookupError, Result},
    model::{CityRecord, Coordinates},
};

/// Row layout of the world cities CSV. Columns not named here are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    country: String,
    city_ascii: String,
    lat: f64,
    lng: f64,
}

impl From<CsvRow> for CityRecord {
    fn from(row: CsvRow) -> Self {
        CityRecord {
            name: row.city_ascii,
            country: row.country,
            latitude: row.lat,
            longitude: row.lng,
        }
    }
}

/// Immutable set of cities, loaded once and passed to whoever needs lookups.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    records: Vec<CityRecord>,
}

impl Directory {
    /// Load the whole dataset from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Dataset {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let directory = Self::from_reader(file).map_err(|e| match e {
            Error::DatasetFormat(source) => Error::Dataset {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        info!(path = %path.display(), cities = directory.len(), "loaded city dataset");
        Ok(directory)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let records = csv
            .deserialize::<CsvRow>()
            .map(|row| row.map(CityRecord::from))
            .collect::<Result<Vec<_>, csv::Error>>()?;

        Ok(Self { records })
    }

    pub fn from_records(records: Vec<CityRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CityRecord] {
        &self.records
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.country.as_str()).collect()
    }

    /// Distinct city names within `country`, sorted. Empty for an unknown country.
    pub fn cities(&self, country: &str) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter(|r| r.country == country)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Coordinates of the single row matching `(country, city)`.
    pub fn coordinates_of(&self, country: &str, city: &str) -> Result<Coordinates, LookupError> {
        let matches: Vec<&CityRecord> = self
            .records
            .iter()
            .filter(|r| r.country == country && r.name == city)
            .collect();

        let record = match matches.as_slice() {
            [record] => *record,
            [] => {
                return Err(LookupError::NotFound {
                    country: country.to_string(),
                    city: city.to_string(),
                });
            }
            many => {
                return Err(LookupError::Ambiguous {
                    country: country.to_string(),
                    city: city.to_string(),
                    matches: many.len(),
                });
            }
        };

        debug!(country, city, lat = record.latitude, lon = record.longitude, "resolved city");
        Ok(record.coordinates())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "\
\"city\",\"city_ascii\",\"lat\",\"lng\",\"country\",\"iso2\",\"iso3\",\"admin_name\",\"capital\",\"population\",\"id\"
\"New York\",\"New York\",\"40.6943\",\"-73.9249\",\"United States\",\"US\",\"USA\",\"New York\",\"\",\"18908608\",\"1840034016\"
\"Los Angeles\",\"Los Angeles\",\"34.1141\",\"-118.4068\",\"United States\",\"US\",\"USA\",\"California\",\"\",\"11922389\",\"1840020491\"
\"Chicago\",\"Chicago\",\"41.8375\",\"-87.6866\",\"United States\",\"US\",\"USA\",\"Illinois\",\"\",\"8497759\",\"1840000494\"
\"Tōkyō\",\"Tokyo\",\"35.6897\",\"139.6922\",\"Japan\",\"JP\",\"JPN\",\"Tōkyō\",\"primary\",\"37732000\",\"1392685764\"
\"Paris\",\"Paris\",\"48.8567\",\"2.3522\",\"France\",\"FR\",\"FRA\",\"Île-de-France\",\"primary\",\"11060000\",\"1250015082\"
\"Springfield\",\"Springfield\",\"39.7710\",\"-89.6537\",\"United States\",\"US\",\"USA\",\"Illinois\",\"admin\",\"114394\",\"1840009517\"
\"Springfield\",\"Springfield\",\"42.1155\",\"-72.5395\",\"United States\",\"US\",\"USA\",\"Massachusetts\",\"\",\"153672\",\"1840000466\"
";

    fn sample() -> Directory {
        Directory::from_reader(SAMPLE.as_bytes()).expect("sample dataset must parse")
    }

    #[test]
    fn countries_are_sorted_and_distinct() {
        let dir = sample();
        let countries: Vec<&str> = dir.countries().into_iter().collect();
        assert_eq!(countries, vec!["France", "Japan", "United States"]);
    }

    #[test]
    fn cities_are_sorted_per_country_and_use_ascii_names() {
        let dir = sample();
        let us: Vec<&str> = dir.cities("United States").into_iter().collect();
        assert_eq!(us, vec!["Chicago", "Los Angeles", "New York", "Springfield"]);

        let jp: Vec<&str> = dir.cities("Japan").into_iter().collect();
        assert_eq!(jp, vec!["Tokyo"]);
    }

    #[test]
    fn unknown_country_has_no_cities() {
        assert!(sample().cities("Atlantis").is_empty());
    }

    #[test]
    fn every_listed_city_resolves_to_valid_coordinates() {
        let dir = sample();
        for country in dir.countries() {
            let cities = dir.cities(country);
            assert!(!cities.is_empty(), "{country} has no cities");

            for city in cities {
                if city == "Springfield" {
                    continue;
                }
                let c = dir.coordinates_of(country, city).expect("unique city must resolve");
                assert!((-90.0..=90.0).contains(&c.latitude));
                assert!((-180.0..=180.0).contains(&c.longitude));
            }
        }
    }

    #[test]
    fn new_york_coordinates() {
        let c = sample().coordinates_of("United States", "New York").unwrap();
        assert!((c.latitude - 40.69).abs() < 0.1);
        assert!((c.longitude + 73.92).abs() < 0.1);
    }

    #[test]
    fn coordinates_of_is_idempotent() {
        let dir = sample();
        let first = dir.coordinates_of("France", "Paris").unwrap();
        let second = dir.coordinates_of("France", "Paris").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_city_is_not_found() {
        let err = sample().coordinates_of("France", "Lyon").unwrap_err();
        assert_eq!(
            err,
            LookupError::NotFound {
                country: "France".into(),
                city: "Lyon".into()
            }
        );
    }

    #[test]
    fn city_in_wrong_country_is_not_found() {
        let err = sample().coordinates_of("Japan", "Paris").unwrap_err();
        assert!(matches!(err, LookupError::NotFound { .. }));
    }

    #[test]
    fn duplicate_rows_are_ambiguous() {
        let err = sample()
            .coordinates_of("United States", "Springfield")
            .unwrap_err();
        assert!(matches!(err, LookupError::Ambiguous { matches: 2, .. }));
        assert!(err.to_string().contains("2 rows match"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dir = Directory::load(file.path()).unwrap();
        assert_eq!(dir.len(), 7);
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let err = Directory::load("/definitely/not/here/worldcities.csv").unwrap_err();
        assert!(matches!(err, Error::Dataset { .. }));
        assert!(err.to_string().contains("worldcities.csv"));
    }

    #[test]
    fn bad_coordinate_is_a_format_error() {
        let data = "country,city_ascii,lat,lng\nFrance,Paris,not-a-number,2.35\n";
        let err = Directory::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DatasetFormat(_)));
    }

    #[test]
    fn from_records_builds_directory() {
        let dir = Directory::from_records(vec![CityRecord {
            name: "Oslo".into(),
            country: "Norway".into(),
            latitude: 59.91,
            longitude: 10.75,
        }]);
        assert_eq!(
            dir.coordinates_of("Norway", "Oslo").unwrap(),
            Coordinates::new(59.91, 10.75)
        );
    }
}
