//! Implicit tunnel volumes
//!
//! Each tunnel shape is an implicit volume: a signed distance field plus
//! point classification, segment/surface intersection by bisection, and a
//! coarse debug mesh. Shapes additionally synthesize their own interior
//! surface as a ring mesh.

pub mod rings;
pub mod cylinder;
pub mod spline;
pub mod cave;
pub mod shape;

pub use cylinder::CylinderShape;
pub use spline::SplineShape;
pub use cave::CaveShape;
pub use shape::TunnelShape;

use crate::core::types::{Vec3, Mat4};
use crate::mesh::MeshData;
use crate::terrain::TerrainHeightQuerier;

/// Distance band around the surface treated as "on" it, world units
pub const SURFACE_EPSILON: f32 = 0.01;

/// Fixed bisection iteration count for segment/surface intersection
const BISECTION_ITERATIONS: u32 = 20;

/// Where a point sits relative to a volume's surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Inside,
    Outside,
    OnSurface,
}

impl Classification {
    /// Classify a signed distance: `|d| <= epsilon` is OnSurface,
    /// otherwise the sign decides.
    pub fn from_distance(d: f32) -> Self {
        if d.abs() <= SURFACE_EPSILON {
            Classification::OnSurface
        } else if d < 0.0 {
            Classification::Inside
        } else {
            Classification::Outside
        }
    }
}

/// A volume defined by a signed distance field (negative inside).
pub trait ImplicitVolume {
    /// Signed distance from `p` to the volume surface, negative inside
    fn signed_distance(&self, p: Vec3) -> f32;

    /// Classify `p` against the surface with the crate epsilon
    fn classify(&self, p: Vec3) -> Classification {
        Classification::from_distance(self.signed_distance(p))
    }

    /// Parametric `t` of the surface crossing on the segment `p0..p1`,
    /// or None when both endpoints sit on the same side.
    ///
    /// Bisection with a fixed iteration count; converges to within
    /// [`SURFACE_EPSILON`] for any continuous SDF regardless of surface
    /// curvature.
    fn intersect_segment(&self, p0: Vec3, p1: Vec3) -> Option<f32> {
        let inside0 = self.signed_distance(p0) < 0.0;
        let inside1 = self.signed_distance(p1) < 0.0;
        if inside0 == inside1 {
            return None;
        }

        let mut lo = 0.0f32;
        let mut hi = 1.0f32;
        for _ in 0..BISECTION_ITERATIONS {
            let mid = (lo + hi) * 0.5;
            let d = self.signed_distance(p0.lerp(p1, mid));
            if d.abs() <= SURFACE_EPSILON {
                return Some(mid);
            }
            if (d < 0.0) == inside0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some((lo + hi) * 0.5)
    }

    /// Coarse visualization mesh and the transform placing it in the world
    fn debug_mesh(&self) -> (MeshData, Mat4);
}

/// A tunnel shape: an implicit volume that can also synthesize its own
/// interior surface mesh.
pub trait TunnelVolume: ImplicitVolume {
    /// Build the tunnel interior as a ring mesh. Cylinder and cave shapes
    /// consult the querier to skip rings whose center is already above
    /// ground; the spline variant emits every ring and leaves terrain
    /// filtering to the clip stage.
    fn generate_interior_mesh(&self, querier: &dyn TerrainHeightQuerier) -> MeshData;
}
