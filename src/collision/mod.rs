//! Collision geometry for carved tunnel interiors
//!
//! The physics representation wants a flat face list (three positions per
//! triangle, duplicated rather than indexed), wrapped in a body with
//! 32-bit collision layer/mask bitmasks. A cheap axis-aligned box proxy is
//! available for cylindrical tunnels only.

use crate::core::error::Error;
use crate::core::types::{Vec3, Mat4, Result};
use crate::mesh::MeshData;
use crate::volume::rings::axis_frame;
use crate::volume::TunnelShape;

/// Concave triangle-soup collision shape: three positions per triangle.
#[derive(Clone, Debug, Default)]
pub struct ConcaveShape {
    pub faces: Vec<Vec3>,
}

impl ConcaveShape {
    /// Flatten a mesh into a face list.
    ///
    /// A triangle referencing an out-of-range vertex index is skipped with
    /// a warning; a mesh yielding fewer than 3 valid triangles is
    /// rejected.
    pub fn from_mesh(mesh: &MeshData) -> Result<Self> {
        let vertex_count = mesh.vertices.len() as u32;
        let mut faces = Vec::with_capacity(mesh.indices.len());
        let mut skipped = 0usize;

        for tri in mesh.indices.chunks_exact(3) {
            if tri.iter().any(|&i| i >= vertex_count) {
                log::warn!(
                    "collision faces: skipping triangle [{}, {}, {}] with index out of range ({} vertices)",
                    tri[0], tri[1], tri[2], vertex_count
                );
                skipped += 1;
                continue;
            }
            faces.push(mesh.vertices[tri[0] as usize]);
            faces.push(mesh.vertices[tri[1] as usize]);
            faces.push(mesh.vertices[tri[2] as usize]);
        }

        if skipped > 0 {
            log::warn!("collision faces: skipped {} invalid triangles", skipped);
        }
        if faces.len() < 9 {
            return Err(Error::InvalidMesh(format!(
                "collision mesh needs at least 3 valid triangles, got {}",
                faces.len() / 3
            )));
        }
        Ok(Self { faces })
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }
}

/// Axis-aligned box proxy in the tunnel's local frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxShape {
    pub size: Vec3,
}

/// Collision shape variants handed to the physics subsystem
#[derive(Clone, Debug)]
pub enum CollisionShape {
    Concave(ConcaveShape),
    Box(BoxShape),
}

/// Physics body wrapper: a collision shape with placement and 32-bit
/// layer/mask bitmasks.
#[derive(Clone, Debug)]
pub struct CollisionBody {
    pub shape: CollisionShape,
    pub transform: Mat4,
    pub layer: u32,
    pub mask: u32,
}

impl CollisionBody {
    pub fn set_layer_bit(&mut self, bit: u32, value: bool) -> Result<()> {
        self.layer = with_bit(self.layer, bit, value)?;
        Ok(())
    }

    pub fn set_mask_bit(&mut self, bit: u32, value: bool) -> Result<()> {
        self.mask = with_bit(self.mask, bit, value)?;
        Ok(())
    }

    pub fn layer_bit(&self, bit: u32) -> Result<bool> {
        check_bit(bit)?;
        Ok(self.layer & (1 << bit) != 0)
    }

    pub fn mask_bit(&self, bit: u32) -> Result<bool> {
        check_bit(bit)?;
        Ok(self.mask & (1 << bit) != 0)
    }
}

fn check_bit(bit: u32) -> Result<()> {
    if bit > 31 {
        return Err(Error::BitOutOfRange(bit));
    }
    Ok(())
}

fn with_bit(bits: u32, bit: u32, value: bool) -> Result<u32> {
    check_bit(bit)?;
    Ok(if value { bits | (1 << bit) } else { bits & !(1 << bit) })
}

/// Builds physics bodies from carved interiors.
#[derive(Clone, Copy, Debug)]
pub struct CollisionGenerator {
    pub layer: u32,
    pub mask: u32,
}

impl Default for CollisionGenerator {
    fn default() -> Self {
        Self { layer: 1, mask: 1 }
    }
}

impl CollisionGenerator {
    /// Full concave body from a clipped interior mesh. The mesh is already
    /// in world space, so the body transform is identity.
    pub fn concave_body(&self, mesh: &MeshData) -> Result<CollisionBody> {
        let shape = ConcaveShape::from_mesh(mesh)?;
        Ok(CollisionBody {
            shape: CollisionShape::Concave(shape),
            transform: Mat4::IDENTITY,
            layer: self.layer,
            mask: self.mask,
        })
    }

    /// Cheap box proxy: supported for cylindrical tunnels only, sized
    /// `(2r, 2r, length)` and centered at mid-length with the local Z axis
    /// along the tunnel axis.
    pub fn box_body(&self, shape: &TunnelShape) -> Result<CollisionBody> {
        let cylinder = match shape {
            TunnelShape::Cylinder(c) => c,
            other => {
                return Err(Error::Unsupported {
                    operation: "box collision approximation",
                    shape: other.variant_name(),
                });
            }
        };

        let size = Vec3::new(
            cylinder.radius * 2.0,
            cylinder.radius * 2.0,
            cylinder.length,
        );
        let center = cylinder.origin + cylinder.direction * (cylinder.length * 0.5);
        Ok(CollisionBody {
            shape: CollisionShape::Box(BoxShape { size }),
            transform: axis_frame(center, cylinder.direction),
            layer: self.layer,
            mask: self.mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::volume::{CaveShape, CylinderShape, SplineShape};

    fn quad_mesh() -> MeshData {
        MeshData::new(
            vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::Y,
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            vec![Vec2::ZERO; 6],
            vec![0, 1, 2, 0, 2, 3, 0, 4, 5],
        )
    }

    #[test]
    fn test_concave_faces_flattened() {
        let shape = ConcaveShape::from_mesh(&quad_mesh()).unwrap();
        assert_eq!(shape.triangle_count(), 3);
        assert_eq!(shape.faces.len(), 9);
        assert_eq!(shape.faces[0], Vec3::ZERO);
        assert_eq!(shape.faces[1], Vec3::X);
    }

    #[test]
    fn test_bad_index_skipped_not_fatal() {
        let mut mesh = quad_mesh();
        mesh.indices.extend_from_slice(&[0, 1, 99]);
        let shape = ConcaveShape::from_mesh(&mesh).unwrap();
        assert_eq!(shape.triangle_count(), 3);
    }

    #[test]
    fn test_too_few_triangles_rejected() {
        let mesh = MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec2::ZERO; 3],
            vec![0, 1, 2],
        );
        assert!(matches!(
            ConcaveShape::from_mesh(&mesh),
            Err(Error::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_layer_mask_bits() {
        let mut body = CollisionGenerator::default()
            .concave_body(&quad_mesh())
            .unwrap();
        assert!(body.layer_bit(0).unwrap());
        body.set_layer_bit(4, true).unwrap();
        body.set_layer_bit(0, false).unwrap();
        assert_eq!(body.layer, 1 << 4);
        body.set_mask_bit(31, true).unwrap();
        assert!(body.mask_bit(31).unwrap());

        assert!(matches!(
            body.set_layer_bit(32, true),
            Err(Error::BitOutOfRange(32))
        ));
        assert!(matches!(body.mask_bit(40), Err(Error::BitOutOfRange(40))));
    }

    #[test]
    fn test_box_body_for_cylinder() {
        let cylinder = CylinderShape::new(Vec3::ZERO, Vec3::Z, 20.0, 3.0);
        let body = CollisionGenerator::default()
            .box_body(&TunnelShape::Cylinder(cylinder))
            .unwrap();
        match body.shape {
            CollisionShape::Box(b) => assert_eq!(b.size, Vec3::new(6.0, 6.0, 20.0)),
            _ => panic!("expected box shape"),
        }
        // Centered at mid-length
        let center = body.transform.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
        // Local +Z maps onto the tunnel axis
        let axis = body.transform.transform_vector3(Vec3::Z);
        assert!((axis - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_box_body_unsupported_variants() {
        let generator = CollisionGenerator::default();
        let spline = TunnelShape::Spline(
            SplineShape::new(&[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)], 2.0, 50).unwrap(),
        );
        assert!(matches!(
            generator.box_body(&spline),
            Err(Error::Unsupported { shape: "spline", .. })
        ));

        let cave = TunnelShape::Cave(CaveShape::new(Vec3::ZERO, Vec3::Z, 10.0, 2.0, 0.3, 1));
        assert!(matches!(
            generator.box_body(&cave),
            Err(Error::Unsupported { shape: "cave", .. })
        ));
    }
}
