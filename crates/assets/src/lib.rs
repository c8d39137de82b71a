//! Startup inputs: the population dataset and the viewer configuration.
//!
//! Both are read once, before any scene exists. A dataset that cannot be
//! fetched, parsed or validated is rejected as a whole.
//!
//! # Invariants
//! - Every returned `CountryRecord` has at least two peaks.
//! - Non-2xx HTTP responses are errors, never parsed as data.
//! - Every config field has a default; an empty YAML document is valid.

mod config;
mod dataset;

pub use config::{
    CameraConfig, ConfigError, ControlsConfig, GridConfig, LightingConfig, PaletteConfig,
    ViewerConfig, WindowConfig,
};
pub use dataset::{
    DEFAULT_DATA_PATH, DatasetSource, LoadError, MIN_PEAKS, decode_response, load_dataset,
    parse_dataset, validate_records,
};

pub fn crate_info() -> &'static str {
    "peakbars-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
