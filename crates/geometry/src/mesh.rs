use glam::{Mat3, Mat4, UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::ray::{Aabb, MeshHit, Ray, intersect_triangle};

/// Triangle mesh with per-vertex positions and normals.
///
/// `indices == None` means the mesh is de-indexed: every three consecutive
/// vertices form one triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    /// Corner positions of every triangle, in draw order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let [a, b, c] = self.triangle_indices(t);
            [self.positions[a], self.positions[b], self.positions[c]]
        })
    }

    fn triangle_indices(&self, t: usize) -> [usize; 3] {
        match &self.indices {
            Some(indices) => [
                indices[t * 3] as usize,
                indices[t * 3 + 1] as usize,
                indices[t * 3 + 2] as usize,
            ],
            None => [t * 3, t * 3 + 1, t * 3 + 2],
        }
    }

    /// Apply an affine transform to positions and (re-normalized) normals.
    pub fn apply_matrix(&mut self, matrix: Mat4) {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = (normal_matrix * *n).normalize_or_zero();
        }
    }

    pub fn translated(mut self, offset: Vec3) -> Self {
        self.apply_matrix(Mat4::from_translation(offset));
        self
    }

    pub fn scaled(mut self, factors: Vec3) -> Self {
        self.apply_matrix(Mat4::from_scale(factors));
        self
    }

    /// Expand indexed triangles into independent vertices.
    pub fn to_non_indexed(&self) -> MeshData {
        let Some(indices) = &self.indices else {
            return self.clone();
        };
        let positions = indices.iter().map(|&i| self.positions[i as usize]).collect();
        let normals = if self.normals.len() == self.positions.len() {
            indices.iter().map(|&i| self.normals[i as usize]).collect()
        } else {
            Vec::new()
        };
        MeshData {
            positions,
            normals,
            indices: None,
        }
    }

    /// Recompute normals from the current positions.
    ///
    /// Indexed meshes get face normals accumulated per shared vertex; de-indexed
    /// meshes end up with one flat normal per triangle.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle_indices(t);
            let n = face_normal(self.positions[a], self.positions[b], self.positions[c]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }

    /// Nearest intersection of `ray` with any triangle. Both faces count.
    pub fn raycast(&self, ray: &Ray) -> Option<MeshHit> {
        let mut best: Option<MeshHit> = None;
        for (face, [a, b, c]) in self.triangles().enumerate() {
            let Some(t) = intersect_triangle(ray, a, b, c) else {
                continue;
            };
            if best.as_ref().is_none_or(|hit| t < hit.distance) {
                best = Some(MeshHit {
                    distance: t,
                    point: ray.at(t),
                    face,
                });
            }
        }
        best
    }
}

/// Unit normal of a counter-clockwise triangle; zero when degenerate.
fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (c - b).cross(a - b).normalize_or_zero()
}

/// Axis-aligned box centered on the origin, subdivided per axis.
///
/// Faces are emitted in the order +X, -X, +Y, -Y, +Z, -Z; each face is a
/// `(gx + 1) x (gy + 1)` vertex grid with two triangles per cell.
pub fn box_geometry(width: f32, height: f32, depth: f32, segments: UVec3) -> MeshData {
    let segments = segments.max(UVec3::ONE);
    let mut builder = PlaneBuilder::default();

    builder.plane([2, 1, 0], -1.0, -1.0, [depth, height, width], segments.z, segments.y);
    builder.plane([2, 1, 0], 1.0, -1.0, [depth, height, -width], segments.z, segments.y);
    builder.plane([0, 2, 1], 1.0, 1.0, [width, depth, height], segments.x, segments.z);
    builder.plane([0, 2, 1], 1.0, -1.0, [width, depth, -height], segments.x, segments.z);
    builder.plane([0, 1, 2], 1.0, -1.0, [width, height, depth], segments.x, segments.y);
    builder.plane([0, 1, 2], -1.0, -1.0, [width, height, -depth], segments.x, segments.y);

    MeshData {
        positions: builder.positions,
        normals: builder.normals,
        indices: Some(builder.indices),
    }
}

#[derive(Default)]
struct PlaneBuilder {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl PlaneBuilder {
    /// `axes` maps (u, v, w) onto (x, y, z) indices; `size` is (width, height, depth)
    /// of the plane in its own frame, with a negative depth flipping the face.
    fn plane(&mut self, axes: [usize; 3], udir: f32, vdir: f32, size: [f32; 3], gx: u32, gy: u32) {
        let [u, v, w] = axes;
        let [width, height, depth] = size;
        let segment_width = width / gx as f32;
        let segment_height = height / gy as f32;
        let (width_half, height_half, depth_half) = (width / 2.0, height / 2.0, depth / 2.0);
        let base = self.positions.len() as u32;

        for iy in 0..=gy {
            let y = iy as f32 * segment_height - height_half;
            for ix in 0..=gx {
                let x = ix as f32 * segment_width - width_half;
                let mut p = [0.0; 3];
                p[u] = x * udir;
                p[v] = y * vdir;
                p[w] = depth_half;
                let mut n = [0.0; 3];
                n[w] = if depth > 0.0 { 1.0 } else { -1.0 };
                self.positions.push(Vec3::from_array(p));
                self.normals.push(Vec3::from_array(n));
            }
        }

        let row = gx + 1;
        for iy in 0..gy {
            for ix in 0..gx {
                let a = base + ix + row * iy;
                let b = base + ix + row * (iy + 1);
                let c = base + ix + 1 + row * (iy + 1);
                let d = base + ix + 1 + row * iy;
                self.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> MeshData {
        box_geometry(1.0, 1.0, 1.0, UVec3::ONE)
    }

    #[test]
    fn unit_box_counts() {
        let mesh = unit_box();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_indexed());
    }

    #[test]
    fn segmented_box_counts() {
        // 4 width segments: +-X faces 4 verts each, +-Y and +-Z faces 10 verts each.
        let mesh = box_geometry(1.0, 1.0, 1.0, UVec3::new(4, 1, 1));
        assert_eq!(mesh.vertex_count(), 4 * 2 + 10 * 4);
        assert_eq!(mesh.triangle_count(), 2 * 2 + 8 * 4);
    }

    #[test]
    fn box_spans_requested_extents() {
        let b = box_geometry(2.0, 4.0, 6.0, UVec3::new(3, 2, 1)).bounds();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn box_faces_wind_outward() {
        let mut mesh = unit_box().to_non_indexed();
        let authored = mesh.normals.clone();
        mesh.compute_vertex_normals();
        for (computed, expected) in mesh.normals.iter().zip(&authored) {
            assert!(computed.abs_diff_eq(*expected, 1e-6), "{computed} vs {expected}");
        }
    }

    #[test]
    fn non_indexed_duplicates_corners() {
        let flat = unit_box().to_non_indexed();
        assert!(!flat.is_indexed());
        assert_eq!(flat.vertex_count(), 36);
        assert_eq!(flat.triangle_count(), 12);
    }

    #[test]
    fn translate_and_scale_chain() {
        let b = unit_box()
            .translated(Vec3::new(0.5, 0.5, 1.0))
            .scaled(Vec3::new(3.0, 2.0, 0.1))
            .bounds();
        assert!(b.min.abs_diff_eq(Vec3::new(0.0, 0.0, 0.05), 1e-6));
        assert!(b.max.abs_diff_eq(Vec3::new(3.0, 2.0, 0.15), 1e-6));
    }

    #[test]
    fn flat_normals_differ_across_a_crease() {
        // Tent: two triangles sharing an edge along Z, tilted opposite ways.
        let mut mesh = MeshData {
            positions: vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            normals: Vec::new(),
            indices: None,
        };
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals[0], mesh.normals[2]);
        assert_ne!(mesh.normals[0], mesh.normals[3]);
        assert!(mesh.normals[0].y > 0.0 && mesh.normals[3].y > 0.0);
    }

    #[test]
    fn raycast_hits_nearest_face() {
        let mesh = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = mesh.raycast(&ray).unwrap();
        assert!((hit.distance - 4.5).abs() < 1e-5);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
    }

    #[test]
    fn raycast_misses() {
        let mesh = unit_box();
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(mesh.raycast(&ray).is_none());
    }
}
