use serde::{Deserialize, Serialize};

/// One country's series of population peaks, as found in the input dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub country_name: String,
    pub peaks: Vec<f64>,
}

impl CountryRecord {
    pub fn new(country_name: impl Into<String>, peaks: Vec<f64>) -> Self {
        Self {
            country_name: country_name.into(),
            peaks,
        }
    }

    /// The latest value of the series.
    pub fn latest(&self) -> Option<f64> {
        self.peaks.last().copied()
    }
}
