use glam::{UVec3, Vec3};
use peakbars_geometry::{MeshData, box_geometry};

use crate::error::BarError;

/// World units of height per unit of peak value.
pub const HEIGHT_SCALE: f32 = 1.5;
/// Total width of every bar, whatever its peak count.
pub const BAR_WIDTH: f32 = 10.0;
pub const BAR_DEPTH: f32 = 0.1;

/// Vertices above this height (in the stretched unit box) belong to the top.
const MIDLINE: f32 = 0.5;

/// A bar mesh plus the two local-space tooltip anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct BarMesh {
    pub mesh: MeshData,
    /// Below the first peak, then above the last one.
    pub anchors: [Vec3; 2],
}

/// Build the height-mapped bar for `peaks`.
///
/// The bar has one segment between each pair of consecutive peaks. Its top
/// edge runs through the scaled peak values, its base stays flat at `y = 0`,
/// and it is centered on the origin along X with a total width of
/// [`BAR_WIDTH`]. Normals are flat, one per triangle.
pub fn build_bar(peaks: &[f64]) -> Result<BarMesh, BarError> {
    let n = peaks.len();
    if n < 2 {
        return Err(BarError::TooFewPeaks { len: n });
    }
    let segments = (n - 1) as f32;

    let mut mesh = box_geometry(1.0, 1.0, 1.0, UVec3::new(n as u32 - 1, 1, 1))
        .translated(Vec3::new(0.5, 0.5, 1.0))
        .scaled(Vec3::new(segments, 2.0, BAR_DEPTH));

    for p in &mut mesh.positions {
        if p.y > MIDLINE {
            let i = (p.x.round().max(0.0) as usize).min(n - 1);
            p.y = peaks[i] as f32 * HEIGHT_SCALE;
        }
    }

    let mut mesh = mesh
        .translated(Vec3::new(-segments / 2.0, 0.0, 0.0))
        .scaled(Vec3::new(BAR_WIDTH / segments, 1.0, 1.0))
        .to_non_indexed();
    mesh.compute_vertex_normals();

    let half = n as f32 / 2.0;
    let first = peaks[0] as f32 * HEIGHT_SCALE;
    let last = peaks[n - 1] as f32 * HEIGHT_SCALE;
    let anchors = [
        Vec3::new(-half, first - 1.0, 0.0),
        Vec3::new(half, last + 1.0, 0.0),
    ];

    Ok(BarMesh { mesh, anchors })
}
