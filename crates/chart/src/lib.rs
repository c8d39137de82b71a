//! Chart model: turns country records into height-mapped bars and tracks
//! which one is highlighted.
//!
//! # Invariants
//! - Every bar spans the same total width, whatever its peak count.
//! - The outline overlay and both tooltips are shown and hidden together.
//! - Outline geometry is rebuilt on every selection, never edited in place;
//!   the previous geometry is released before the new one is assigned.
//! - Tooltip positions stay inside the viewport.

mod bar;
mod error;
mod gradient;
mod group;
mod outline;
mod tooltip;
mod widget;

pub use bar::{BAR_DEPTH, BAR_WIDTH, BarMesh, HEIGHT_SCALE, build_bar};
pub use error::{BarError, ChartError};
pub use gradient::Gradient;
pub use group::CountryBar;
pub use outline::{GeometryStats, OUTLINE_THRESHOLD_DEGREES, OutlineOverlay};
pub use tooltip::{TOOLTIP_MARGIN, Tooltip, clamp_to_viewport};
pub use widget::{BAR_SPACING, DatasetWidget, WidgetStyle, lateral_offset};

pub fn crate_info() -> &'static str {
    "peakbars-chart v0.1.0"
}
