//! Ring-mesh construction shared by the tunnel shapes
//!
//! A tunnel interior is a stack of vertex rings along the shape's axis or
//! path, triangulated as quads between consecutive rings. Rings may be
//! skipped (terrain pre-filtering), so the vertex grid is tracked in a
//! `HashMap<(ring, col), index>` and quads are only emitted where both
//! rings exist.

use std::collections::HashMap;

use crate::core::types::{Vec2, Vec3};
use crate::mesh::MeshData;

/// Accumulates vertex rings and triangulates them into a tunnel wall mesh.
pub struct RingMeshBuilder {
    radial_segments: u32,
    length_segments: u32,
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    /// (ring, col) -> vertex index; col spans 0..=radial_segments (wrap)
    grid: HashMap<(i32, i32), u32>,
    emitted_rings: Vec<i32>,
}

impl RingMeshBuilder {
    pub fn new(radial_segments: u32, length_segments: u32) -> Self {
        Self {
            radial_segments,
            length_segments,
            vertices: Vec::new(),
            uvs: Vec::new(),
            grid: HashMap::new(),
            emitted_rings: Vec::new(),
        }
    }

    /// Emit one ring of `radial_segments + 1` vertices (the last wraps back
    /// to the first column's position with u = 1.0). `radius_at` maps the
    /// wrapped column index and its angle to a radius, so shapes can
    /// perturb individual vertices.
    pub fn push_ring(
        &mut self,
        ring: i32,
        center: Vec3,
        right: Vec3,
        up: Vec3,
        mut radius_at: impl FnMut(u32, f32) -> f32,
    ) {
        let v = ring as f32 / self.length_segments as f32;
        for col in 0..=self.radial_segments {
            // Wrap column reuses column 0's angle and radius so the seam
            // is positionally closed
            let wrapped = col % self.radial_segments.max(1);
            let angle = wrapped as f32 / self.radial_segments as f32 * std::f32::consts::TAU;
            let radius = radius_at(wrapped, angle);
            let position = center + (right * angle.cos() + up * angle.sin()) * radius;

            let u = col as f32 / self.radial_segments as f32;
            let index = self.vertices.len() as u32;
            self.vertices.push(position);
            self.uvs.push(Vec2::new(u, v));
            self.grid.insert((ring, col as i32), index);
        }
        self.emitted_rings.push(ring);
    }

    /// Triangulate quads between consecutive emitted rings. Rings skipped
    /// by terrain pre-filtering leave gaps; a quad needs all four corners.
    pub fn build(self) -> MeshData {
        let mut indices = Vec::new();
        for pair in self.emitted_rings.windows(2) {
            let (r0, r1) = (pair[0], pair[1]);
            if r1 != r0 + 1 {
                continue;
            }
            for col in 0..self.radial_segments as i32 {
                let a = self.grid[&(r0, col)];
                let b = self.grid[&(r0, col + 1)];
                let c = self.grid[&(r1, col + 1)];
                let d = self.grid[&(r1, col)];
                // Outward-facing winding for counterclockwise rings
                indices.extend_from_slice(&[a, b, c]);
                indices.extend_from_slice(&[a, c, d]);
            }
        }
        MeshData::new(self.vertices, self.uvs, indices)
    }
}

/// Orthonormal basis perpendicular to a unit axis. Falls back to the X
/// axis as the hint when the axis is nearly vertical.
pub fn axis_basis(direction: Vec3) -> (Vec3, Vec3) {
    let hint = if direction.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let right = hint.cross(direction).normalize();
    let up = direction.cross(right);
    (right, up)
}

/// World transform whose Z column is the given axis
pub fn axis_frame(origin: Vec3, direction: Vec3) -> glam::Mat4 {
    let (right, up) = axis_basis(direction);
    glam::Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        direction.extend(0.0),
        origin.extend(1.0),
    )
}
