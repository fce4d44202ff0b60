//! Degenerate-triangle elimination

use crate::core::types::Vec3;
use super::data::MeshData;

/// Triangles with cross-product area below this are dropped
const MIN_TRIANGLE_AREA: f32 = 1e-4;

/// Remove degenerate triangles: any triangle with a repeated vertex index
/// or with cross-product area below `1e-4`.
///
/// Vertices and UVs pass through untouched; only the index list shrinks.
/// Running the pass on an already-optimized mesh returns it byte-identical.
pub fn optimize(mesh: MeshData) -> MeshData {
    let mut indices = Vec::with_capacity(mesh.indices.len());
    let mut removed = 0usize;

    for tri in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            removed += 1;
            continue;
        }
        let v0 = mesh.vertices[i0 as usize];
        let v1 = mesh.vertices[i1 as usize];
        let v2 = mesh.vertices[i2 as usize];
        if triangle_area(v0, v1, v2) < MIN_TRIANGLE_AREA {
            removed += 1;
            continue;
        }
        indices.extend_from_slice(tri);
    }

    if removed > 0 {
        log::debug!("optimize: removed {} degenerate triangles", removed);
    }

    MeshData { indices, ..mesh }
}

/// Half the cross-product magnitude of two edges
fn triangle_area(v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    (v1 - v0).cross(v2 - v0).length() * 0.5
}
