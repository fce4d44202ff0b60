//! Mesh data: vertices, UVs, and a triangle index list

use crate::core::types::{Vec2, Vec3, Result};
use crate::core::error::Error;

/// Indexed triangle mesh with per-vertex UVs.
///
/// `width`/`height` carry grid dimensions when the mesh originates from a
/// regular height-field grid, 0 otherwise. `mesh_size` is the world XZ
/// extent of that grid. Buffers are moved between pipeline stages, never
/// shared-mutated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// Grid columns (0 if not grid-born)
    pub width: u32,
    /// Grid rows (0 if not grid-born)
    pub height: u32,
    /// World XZ extents of the source grid
    pub mesh_size: Vec2,
}

impl MeshData {
    /// Create a non-grid mesh from raw buffers
    pub fn new(vertices: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            uvs,
            indices,
            width: 0,
            height: 0,
            mesh_size: Vec2::ZERO,
        }
    }

    /// Create an empty mesh (the explicit "nothing usable" result)
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if the mesh has no triangles.
    ///
    /// Emptiness is defined by the index list alone: clipping stages carry
    /// the source vertex/UV buffers over wholesale and never compact, so
    /// an empty mesh may still hold orphaned vertices.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles in the index list
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check structural invariants: index list length divisible by 3,
    /// every index in range, one UV per vertex.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index count {} not divisible by 3",
                self.indices.len()
            )));
        }
        if self.uvs.len() != self.vertices.len() {
            return Err(Error::InvalidMesh(format!(
                "{} uvs for {} vertices",
                self.uvs.len(),
                self.vertices.len()
            )));
        }
        let vertex_count = self.vertices.len() as u32;
        if let Some(&bad) = self.indices.iter().find(|&&i| i >= vertex_count) {
            return Err(Error::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }
        Ok(())
    }

    /// Min/max corners of the vertex positions, None for an empty vertex list
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for &v in &self.vertices[1..] {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mesh = MeshData::empty();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.validate().is_ok());
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mesh = MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec2::ZERO; 3],
            vec![0, 1, 5],
        );
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_uv_mismatch() {
        let mesh = MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec2::ZERO; 2],
            vec![0, 1, 2],
        );
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_bounds() {
        let mesh = MeshData::new(
            vec![Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, -2.0, 0.0), Vec3::Y],
            vec![Vec2::ZERO; 3],
            vec![0, 1, 2],
        );
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 1.0, 2.0));
    }
}
