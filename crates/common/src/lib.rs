//! Shared types for the peakbars workspace.
//!
//! # Invariants
//! - `Color` values are linear RGB; hex constructors decode sRGB.
//! - `CountryRecord` is immutable input; peak order is meaningful and the last
//!   peak is the latest value.

mod color;
mod record;
mod types;

pub use color::Color;
pub use record::CountryRecord;
pub use types::Transform;

pub fn crate_info() -> &'static str {
    "peakbars-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
