//! wgpu render backend for the chart.
//!
//! Draws any `Frame`: triangle renderables with Lambert lighting, line
//! renderables flat, and renderables that opt out of depth testing on top of
//! everything else.
//!
//! # Invariants
//! - Renderer never mutates chart state.
//! - GPU buffers are keyed by `GeometryId`. Buffers whose id is absent from
//!   the frame are destroyed before any new geometry is uploaded.

mod cache;
mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
