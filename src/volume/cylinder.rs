//! Cylindrical tunnel shape

use crate::core::types::{Vec2, Vec3, Mat4};
use crate::mesh::MeshData;
use crate::terrain::TerrainHeightQuerier;
use super::rings::{axis_basis, RingMeshBuilder};
use super::{ImplicitVolume, TunnelVolume};

/// Straight tunnel with a fixed radius: a finite capped cylinder with flat
/// end disks.
#[derive(Clone, Debug)]
pub struct CylinderShape {
    pub origin: Vec3,
    /// Unit axis from origin toward the far end
    pub direction: Vec3,
    pub length: f32,
    pub radius: f32,
    pub radial_segments: u32,
    pub length_segments: u32,
}

impl CylinderShape {
    pub fn new(origin: Vec3, direction: Vec3, length: f32, radius: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            length,
            radius,
            radial_segments: 16,
            length_segments: 20,
        }
    }

    /// Axial and radial offsets of `p` in the cylinder's frame
    fn axial_radial(&self, p: Vec3) -> (f32, f32) {
        let rel = p - self.origin;
        let axial = rel.dot(self.direction);
        let radial = (rel - self.direction * axial).length();
        (axial, radial)
    }

    /// World transform whose Z column is the tunnel axis
    pub(crate) fn frame(&self) -> Mat4 {
        super::rings::axis_frame(self.origin, self.direction)
    }
}

impl ImplicitVolume for CylinderShape {
    /// Exact Euclidean SDF to the finite capped cylinder.
    fn signed_distance(&self, p: Vec3) -> f32 {
        let (axial, radial) = self.axial_radial(p);
        let radial_sd = radial - self.radius;
        let cap_sd = (-axial).max(axial - self.length);
        if radial_sd < 0.0 && cap_sd < 0.0 {
            // Interior: distance to the nearest face is the shallower of
            // the two penetrations
            radial_sd.max(cap_sd)
        } else {
            (radial_sd.max(0.0).powi(2) + cap_sd.max(0.0).powi(2)).sqrt()
        }
    }

    fn debug_mesh(&self) -> (MeshData, Mat4) {
        let mut builder = RingMeshBuilder::new(8, 4);
        for ring in 0..=4 {
            let z = ring as f32 / 4.0 * self.length;
            builder.push_ring(ring, Vec3::new(0.0, 0.0, z), Vec3::X, Vec3::Y, |_, _| {
                self.radius
            });
        }
        (builder.build(), self.frame())
    }
}

impl TunnelVolume for CylinderShape {
    /// Stack rings along the axis, skipping rings whose center is already
    /// at or above the terrain surface.
    fn generate_interior_mesh(&self, querier: &dyn TerrainHeightQuerier) -> MeshData {
        let (right, up) = axis_basis(self.direction);
        let mut builder = RingMeshBuilder::new(self.radial_segments, self.length_segments);

        for ring in 0..=self.length_segments as i32 {
            let t = ring as f32 / self.length_segments as f32;
            let center = self.origin + self.direction * (t * self.length);
            let ground = querier.height_at(Vec2::new(center.x, center.z));
            if center.y >= ground {
                continue;
            }
            builder.push_ring(ring, center, right, up, |_, _| self.radius);
        }
        builder.build()
    }
}
