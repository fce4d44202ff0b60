//! Closed set of tunnel shape variants

use crate::core::types::{Vec3, Mat4};
use crate::mesh::MeshData;
use crate::terrain::TerrainHeightQuerier;
use super::{CaveShape, CylinderShape, ImplicitVolume, SplineShape, TunnelVolume};

/// Tagged union over the tunnel shape variants. Carving and generation
/// code dispatches by match; no variant carries behavior the others lack
/// except the cylinder-only box collision proxy.
#[derive(Clone, Debug)]
pub enum TunnelShape {
    Cylinder(CylinderShape),
    Spline(SplineShape),
    Cave(CaveShape),
}

impl TunnelShape {
    /// Variant name for logs and error messages
    pub fn variant_name(&self) -> &'static str {
        match self {
            TunnelShape::Cylinder(_) => "cylinder",
            TunnelShape::Spline(_) => "spline",
            TunnelShape::Cave(_) => "cave",
        }
    }
}

impl ImplicitVolume for TunnelShape {
    fn signed_distance(&self, p: Vec3) -> f32 {
        match self {
            TunnelShape::Cylinder(s) => s.signed_distance(p),
            TunnelShape::Spline(s) => s.signed_distance(p),
            TunnelShape::Cave(s) => s.signed_distance(p),
        }
    }

    fn debug_mesh(&self) -> (MeshData, Mat4) {
        match self {
            TunnelShape::Cylinder(s) => s.debug_mesh(),
            TunnelShape::Spline(s) => s.debug_mesh(),
            TunnelShape::Cave(s) => s.debug_mesh(),
        }
    }
}

impl TunnelVolume for TunnelShape {
    fn generate_interior_mesh(&self, querier: &dyn TerrainHeightQuerier) -> MeshData {
        match self {
            TunnelShape::Cylinder(s) => s.generate_interior_mesh(querier),
            TunnelShape::Spline(s) => s.generate_interior_mesh(querier),
            TunnelShape::Cave(s) => s.generate_interior_mesh(querier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Classification;

    #[test]
    fn test_enum_dispatch_matches_inner() {
        let inner = CylinderShape::new(Vec3::ZERO, Vec3::Z, 20.0, 3.0);
        let shape = TunnelShape::Cylinder(inner.clone());
        let p = Vec3::new(1.0, 2.0, 5.0);
        assert_eq!(shape.signed_distance(p), inner.signed_distance(p));
        assert_eq!(shape.classify(p), inner.classify(p));
    }

    #[test]
    fn test_variant_names() {
        let cyl = TunnelShape::Cylinder(CylinderShape::new(Vec3::ZERO, Vec3::Z, 10.0, 2.0));
        assert_eq!(cyl.variant_name(), "cylinder");
        let cave = TunnelShape::Cave(CaveShape::new(Vec3::ZERO, Vec3::Z, 10.0, 2.0, 0.3, 1));
        assert_eq!(cave.variant_name(), "cave");
    }

    #[test]
    fn test_trait_object_use() {
        let shape = TunnelShape::Cave(CaveShape::new(Vec3::ZERO, Vec3::Z, 10.0, 2.0, 0.3, 1));
        let volume: &dyn ImplicitVolume = &shape;
        assert_eq!(volume.classify(Vec3::new(100.0, 0.0, 0.0)), Classification::Outside);
    }
}
