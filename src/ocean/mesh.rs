//! Flat subdivided plane for the ocean surface.
//!
//! The grid is built once and never touched again; all wave motion is GPU
//! displacement in the vertex shader.

use std::f32::consts::FRAC_PI_2;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Side length of the plane in world units.
pub const PLANE_EXTENT: f32 = 8.0;

/// Vertex data for the ocean mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Immutable ocean grid mesh.
pub struct OceanGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    subdivisions: u32,
}

impl OceanGrid {
    /// Build an N x N subdivided plane in the XY plane, centered on the
    /// origin, with UVs spanning [0, 1]^2.
    ///
    /// A power-of-two subdivision count gives the most predictable
    /// tessellation, but any count in 1..=1024 works.
    pub fn new(subdivisions: u32) -> Self {
        let n = subdivisions;
        let half = PLANE_EXTENT / 2.0;

        let mut vertices = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
        for y in 0..=n {
            for x in 0..=n {
                let u = x as f32 / n as f32;
                let v = y as f32 / n as f32;
                vertices.push(Vertex {
                    position: [u * PLANE_EXTENT - half, v * PLANE_EXTENT - half, 0.0],
                    uv: [u, v],
                });
            }
        }

        // Two CCW triangles per cell, front faces toward +Z.
        let mut indices = Vec::with_capacity((n * n * 6) as usize);
        for y in 0..n {
            for x in 0..n {
                let i00 = y * (n + 1) + x;
                let i10 = i00 + 1;
                let i01 = (y + 1) * (n + 1) + x;
                let i11 = i01 + 1;

                indices.extend_from_slice(&[i00, i10, i11, i00, i11, i01]);
            }
        }

        Self {
            vertices,
            indices,
            subdivisions: n,
        }
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Fixed model rotation laying the plane horizontal, front faces up.
    pub fn model_matrix() -> Mat4 {
        Mat4::from_rotation_x(-FRAC_PI_2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn grid_has_expected_vertex_and_index_counts() {
        for n in [1u32, 4, 16, 512] {
            let grid = OceanGrid::new(n);
            assert_eq!(grid.vertices.len() as u32, (n + 1) * (n + 1));
            assert_eq!(grid.index_count(), 6 * n * n);
        }
    }

    #[test]
    fn positions_stay_within_plane_extent() {
        let grid = OceanGrid::new(8);
        let half = PLANE_EXTENT / 2.0;
        for v in &grid.vertices {
            assert!(v.position[0].abs() <= half + 1e-5);
            assert!(v.position[1].abs() <= half + 1e-5);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn uv_corners_span_unit_square() {
        let grid = OceanGrid::new(4);
        let first = grid.vertices.first().unwrap();
        let last = grid.vertices.last().unwrap();
        assert_eq!(first.uv, [0.0, 0.0]);
        assert_eq!(last.uv, [1.0, 1.0]);
    }

    #[test]
    fn all_indices_reference_valid_vertices() {
        let grid = OceanGrid::new(7);
        let count = grid.vertices.len() as u32;
        assert!(grid.indices.iter().all(|&i| i < count));
        assert_eq!(grid.indices.len() % 3, 0);
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let grid = OceanGrid::new(2);
        for tri in grid.indices.chunks(3) {
            let a = Vec3::from_array(grid.vertices[tri[0] as usize].position);
            let b = Vec3::from_array(grid.vertices[tri[1] as usize].position);
            let c = Vec3::from_array(grid.vertices[tri[2] as usize].position);
            let normal = (b - a).cross(c - a);
            assert!(normal.z > 0.0, "triangle {:?} winds clockwise", tri);
        }
    }

    #[test]
    fn model_matrix_lays_plane_horizontal() {
        let model = OceanGrid::model_matrix();
        // A point in the vertical plane lands at height zero...
        let p = model * Vec4::new(1.0, 2.0, 0.0, 1.0);
        assert!(p.y.abs() < 1e-6);
        // ...and the plane normal becomes straight up.
        let normal = model * Vec4::new(0.0, 0.0, 1.0, 0.0);
        assert!((Vec3::new(normal.x, normal.y, normal.z) - Vec3::Y).length() < 1e-6);
    }
}
