use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use peakbars_common::CountryRecord;

/// Dataset location used when none is given.
pub const DEFAULT_DATA_PATH: &str = "data/population_data.json";

/// Shortest series a bar can be built from.
pub const MIN_PEAKS: usize = 2;

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Http(String),
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::File(PathBuf::from(DEFAULT_DATA_PATH))
    }
}

impl FromStr for DatasetSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(DatasetSource::Http(s.to_string()))
        } else {
            Ok(DatasetSource::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Http(url) => f.write_str(url),
        }
    }
}

/// Errors from fetching or validating the dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP {status} fetching dataset")]
    Http { status: u16 },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record {index} ({country:?}) has {len} peaks, need at least 2")]
    InvalidRecord {
        index: usize,
        country: String,
        len: usize,
    },
}

/// Fetch, parse and validate the dataset. Blocks until done.
pub fn load_dataset(source: &DatasetSource) -> Result<Vec<CountryRecord>, LoadError> {
    let records = match source {
        DatasetSource::File(path) => parse_dataset(&std::fs::read_to_string(path)?)?,
        DatasetSource::Http(url) => {
            let response = reqwest::blocking::get(url)?;
            let status = response.status().as_u16();
            let body = response.text()?;
            decode_response(status, &body)?
        }
    };
    tracing::info!(%source, countries = records.len(), "dataset loaded");
    Ok(records)
}

/// Interpret an HTTP response. Anything outside 2xx is an error.
pub fn decode_response(status: u16, body: &str) -> Result<Vec<CountryRecord>, LoadError> {
    if !(200..300).contains(&status) {
        return Err(LoadError::Http { status });
    }
    parse_dataset(body)
}

/// Parse a JSON array of records and validate it.
pub fn parse_dataset(json: &str) -> Result<Vec<CountryRecord>, LoadError> {
    let records: Vec<CountryRecord> = serde_json::from_str(json)?;
    validate_records(&records)?;
    if records.is_empty() {
        tracing::warn!("dataset is empty");
    }
    Ok(records)
}

/// Reject the dataset at the first record with fewer than [`MIN_PEAKS`] peaks.
pub fn validate_records(records: &[CountryRecord]) -> Result<(), LoadError> {
    match records
        .iter()
        .enumerate()
        .find(|(_, r)| r.peaks.len() < MIN_PEAKS)
    {
        Some((index, record)) => Err(LoadError::InvalidRecord {
            index,
            country: record.country_name.clone(),
            len: record.peaks.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_COUNTRIES: &str = r#"[
        {"countryName": "A", "peaks": [1, 2]},
        {"countryName": "B", "peaks": [3, 4.5]}
    ]"#;

    #[test]
    fn source_from_str() {
        assert_eq!(
            "https://example.org/data.json".parse::<DatasetSource>().unwrap(),
            DatasetSource::Http("https://example.org/data.json".into())
        );
        assert_eq!(
            "data/population_data.json".parse::<DatasetSource>().unwrap(),
            DatasetSource::File(PathBuf::from("data/population_data.json"))
        );
        assert_eq!(DatasetSource::default().to_string(), DEFAULT_DATA_PATH);
    }

    #[test]
    fn parses_valid_dataset() {
        let records = parse_dataset(TWO_COUNTRIES).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].country_name, "B");
        assert_eq!(records[1].peaks, vec![3.0, 4.5]);
    }

    #[test]
    fn short_series_rejects_whole_dataset() {
        let json = r#"[
            {"countryName": "A", "peaks": [1, 2]},
            {"countryName": "Lonely", "peaks": [7]},
            {"countryName": "Empty", "peaks": []}
        ]"#;
        match parse_dataset(json) {
            Err(LoadError::InvalidRecord { index, country, len }) => {
                assert_eq!(index, 1);
                assert_eq!(country, "Lonely");
                assert_eq!(len, 1);
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse_dataset("{not json"), Err(LoadError::Parse(_))));
        assert!(matches!(
            parse_dataset(r#"[{"country": "A", "peaks": [1, 2]}]"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn empty_array_is_allowed() {
        assert!(parse_dataset("[]").unwrap().is_empty());
    }

    #[test]
    fn not_found_response_is_an_error() {
        let err = decode_response(404, "<html>Not Found</html>").unwrap_err();
        assert!(matches!(err, LoadError::Http { status: 404 }));
        assert_eq!(err.to_string(), "HTTP 404 fetching dataset");
    }

    #[test]
    fn ok_response_is_parsed() {
        assert_eq!(decode_response(200, TWO_COUNTRIES).unwrap().len(), 2);
    }

    #[test]
    fn loads_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(TWO_COUNTRIES.as_bytes()).unwrap();
        let source = DatasetSource::File(tmp.path().to_path_buf());
        assert_eq!(load_dataset(&source).unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatasetSource::File(dir.path().join("missing.json"));
        assert!(matches!(load_dataset(&source), Err(LoadError::Io(_))));
    }

    #[test]
    fn bundled_sample_dataset_is_valid() {
        let records = parse_dataset(include_str!("../../../data/population_data.json")).unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.peaks.len() >= MIN_PEAKS));
    }

    /// Answer one HTTP request on a local port with `response`.
    fn serve_once(response: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 2048];
                let _ = std::io::Read::read(&mut stream, &mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/population_data.json")
    }

    #[test]
    fn http_404_is_an_http_error() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = load_dataset(&DatasetSource::Http(url)).unwrap_err();
        assert!(matches!(err, LoadError::Http { status: 404 }), "{err:?}");
    }

    #[test]
    fn http_ok_is_parsed() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 39\r\nConnection: close\r\n\r\n[{\"countryName\": \"A\", \"peaks\": [1, 2]}]",
        );
        let records = load_dataset(&DatasetSource::Http(url)).unwrap();
        assert_eq!(records, vec![CountryRecord::new("A", vec![1.0, 2.0])]);
    }
}
