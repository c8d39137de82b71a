/// Errors from building a single bar mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BarError {
    #[error("a bar needs at least 2 peaks, got {len}")]
    TooFewPeaks { len: usize },
}

/// Errors from the dataset widget.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    #[error("bar for {country:?}: {source}")]
    Bar {
        country: String,
        #[source]
        source: BarError,
    },
    #[error("no bar at index {index} (widget has {len})")]
    UnknownBar { index: usize, len: usize },
}
