use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::MeshData;

/// Unconnected line segments: vertices `2i` and `2i + 1` form segment `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSegments {
    pub positions: Vec<Vec3>,
}

/// Positions are snapped to this many decimal places when matching shared edges.
const EDGE_PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

struct OpenEdge {
    start: Vec3,
    end: Vec3,
    normal: Vec3,
    open: bool,
}

impl LineSegments {
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.positions.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Outline of `mesh`: every edge where the two adjacent faces meet at more
    /// than `threshold_degrees`, plus every edge with only one adjacent face.
    ///
    /// Degenerate triangles are skipped, so collapsed side walls do not draw.
    pub fn edges(mesh: &MeshData, threshold_degrees: f32) -> Self {
        let threshold_dot = threshold_degrees.to_radians().cos();
        let mut positions = Vec::new();
        let mut edges: Vec<OpenEdge> = Vec::new();
        let mut lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();

        for corners in mesh.triangles() {
            let keys = corners.map(vertex_key);
            if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
                continue;
            }
            let [a, b, c] = corners;
            let normal = (c - b).cross(a - b).normalize_or_zero();

            for j in 0..3 {
                let next = (j + 1) % 3;
                let forward = (keys[j], keys[next]);
                let reverse = (keys[next], keys[j]);

                if let Some(&slot) = lookup.get(&reverse) {
                    let edge = &mut edges[slot];
                    if edge.open {
                        if normal.dot(edge.normal) <= threshold_dot {
                            positions.push(corners[j]);
                            positions.push(corners[next]);
                        }
                        edge.open = false;
                        continue;
                    }
                }
                if !lookup.contains_key(&forward) {
                    lookup.insert(forward, edges.len());
                    edges.push(OpenEdge {
                        start: corners[j],
                        end: corners[next],
                        normal,
                        open: true,
                    });
                }
            }
        }

        for edge in edges.iter().filter(|e| e.open) {
            positions.push(edge.start);
            positions.push(edge.end);
        }

        Self { positions }
    }

    /// Square grid on the XZ plane, `size` wide, with `divisions` cells per side.
    pub fn grid(size: f32, divisions: u32) -> Self {
        let divisions = divisions.max(1);
        let step = size / divisions as f32;
        let half = size / 2.0;
        let mut positions = Vec::with_capacity((divisions as usize + 1) * 4);
        for i in 0..=divisions {
            let k = -half + i as f32 * step;
            positions.push(Vec3::new(-half, 0.0, k));
            positions.push(Vec3::new(half, 0.0, k));
            positions.push(Vec3::new(k, 0.0, -half));
            positions.push(Vec3::new(k, 0.0, half));
        }
        Self { positions }
    }
}

fn vertex_key(p: Vec3) -> VertexKey {
    [
        (p.x * EDGE_PRECISION).round() as i64,
        (p.y * EDGE_PRECISION).round() as i64,
        (p.z * EDGE_PRECISION).round() as i64,
    ]
}
