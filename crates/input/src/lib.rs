//! Pointer input: raw window events become chart actions, and the pointer
//! ray drives hover picking.
//!
//! # Invariants
//! - Hosts produce `ChartAction`s; the scene never sees raw window events.
//! - The pointer position is last-write-wins and sampled once per frame.
//! - A frame whose ray hits nothing always hides the overlay and returns the
//!   controller to `Idle`.

pub mod action;
pub mod picking;
pub mod pointer;

pub use action::{ChartAction, DragButton};
pub use picking::{HoverState, PickingController};
pub use pointer::{DragTracker, PointerState, client_to_ndc};

pub fn crate_info() -> &'static str {
    "peakbars-input v0.1.0"
}
