//! Chart scene: everything one window shows, and the per-frame tick.
//!
//! # Invariants
//! - A scene only exists for a dataset that loaded and validated completely.
//! - Input only records state; `frame` applies it, so a pointer move or a
//!   resize takes effect on the next frame.
//! - Each frame runs the orbit controls before picking, so tooltips are
//!   placed for the camera that is about to be drawn.

mod scene;

pub use scene::{ChartScene, SceneError};

pub fn crate_info() -> &'static str {
    "peakbars-scene v0.1.0"
}
