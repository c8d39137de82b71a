//! Rendering Adapter: the contract between chart logic and a rendering backend.
//!
//! # Invariants
//! - Renderers read renderables; they never mutate chart state.
//! - Everything a backend needs is plain geometry, transforms and colors,
//!   reached through the `Renderable` capability trait.
//! - Camera motion lives here, outside the chart: orbit controls move the
//!   camera, the chart only reads it for projection and picking.

mod camera;
mod controls;
mod lighting;
mod renderable;
mod renderer;

pub use camera::{OrthographicCamera, ndc_to_screen};
pub use controls::OrbitControls;
pub use lighting::{AmbientLight, DirectionalLight, Lighting};
pub use renderable::{LineNode, Primitive, Renderable};
pub use renderer::{DebugTextRenderer, Frame, Renderer};

pub fn crate_info() -> &'static str {
    "peakbars-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
