//! Boolean subtraction of an implicit volume from a mesh
//!
//! Classifies every source vertex against the volume once, then copies,
//! drops, or clips each triangle. Clipping walks the triangle's edges in
//! order, keeps vertices that are not inside the volume, and inserts a
//! bisection intersection vertex (with linearly interpolated UV) on every
//! edge that crosses the surface. The surviving polygon is
//! fan-triangulated.

use crate::mesh::MeshData;
use crate::volume::{Classification, ImplicitVolume};

/// Subtract `volume` from `source`, keeping only geometry outside it.
///
/// Fully-inside triangles are dropped, fully-outside triangles are copied
/// unchanged, straddling triangles are clipped (at most doubling their
/// count). Source vertices are carried over wholesale; intersection
/// vertices are appended.
pub fn subtract(source: MeshData, volume: &dyn ImplicitVolume) -> MeshData {
    if source.is_empty() {
        return source;
    }

    let classifications: Vec<Classification> = source
        .vertices
        .iter()
        .map(|&v| volume.classify(v))
        .collect();

    let mut out = MeshData {
        vertices: source.vertices.clone(),
        uvs: source.uvs.clone(),
        indices: Vec::with_capacity(source.indices.len()),
        width: source.width,
        height: source.height,
        mesh_size: source.mesh_size,
    };

    for tri in source.indices.chunks_exact(3) {
        let inside = [
            classifications[tri[0] as usize] == Classification::Inside,
            classifications[tri[1] as usize] == Classification::Inside,
            classifications[tri[2] as usize] == Classification::Inside,
        ];
        match inside.iter().filter(|&&b| b).count() {
            3 => {}
            0 => out.indices.extend_from_slice(tri),
            _ => clip_triangle(&mut out, volume, tri, inside),
        }
    }

    log::debug!(
        "csg subtract: {} -> {} triangles",
        source.triangle_count(),
        out.triangle_count()
    );
    out
}

/// Clip one straddling triangle, appending the surviving fan to `out`.
fn clip_triangle(out: &mut MeshData, volume: &dyn ImplicitVolume, tri: &[u32], inside: [bool; 3]) {
    let mut polygon: Vec<u32> = Vec::with_capacity(4);

    for edge in 0..3 {
        let a = edge;
        let b = (edge + 1) % 3;
        if !inside[a] {
            polygon.push(tri[a]);
        }
        if inside[a] != inside[b] {
            let va = out.vertices[tri[a] as usize];
            let vb = out.vertices[tri[b] as usize];
            // A kept OnSurface endpoint can still carry a negative signed
            // distance, leaving both endpoints sign-negative with no
            // crossing for bisection to find. Snap to whichever endpoint
            // sits nearer the surface so the seam never moves into the
            // volume.
            let t = volume.intersect_segment(va, vb).unwrap_or_else(|| {
                if volume.signed_distance(va).abs() <= volume.signed_distance(vb).abs() {
                    0.0
                } else {
                    1.0
                }
            });

            let index = out.vertices.len() as u32;
            out.vertices.push(va.lerp(vb, t));
            let ua = out.uvs[tri[a] as usize];
            let ub = out.uvs[tri[b] as usize];
            out.uvs.push(ua.lerp(ub, t));
            polygon.push(index);
        }
    }

    for i in 1..polygon.len().saturating_sub(1) {
        out.indices
            .extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Vec2, Vec3};
    use crate::volume::{CylinderShape, SURFACE_EPSILON};

    /// Flat 4x4 grid of quads in the XZ plane at y = 0
    fn grid_mesh() -> MeshData {
        let n = 5;
        let mut vertices = Vec::new();
        let mut uvs = Vec::new();
        for z in 0..n {
            for x in 0..n {
                vertices.push(Vec3::new(x as f32 * 5.0, 0.0, z as f32 * 5.0));
                uvs.push(Vec2::new(x as f32 / 4.0, z as f32 / 4.0));
            }
        }
        let mut indices = Vec::new();
        for z in 0..n - 1 {
            for x in 0..n - 1 {
                let a = (z * n + x) as u32;
                let b = a + 1;
                let c = a + n as u32 + 1;
                let d = a + n as u32;
                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }
        let mut mesh = MeshData::new(vertices, uvs, indices);
        mesh.width = n as u32;
        mesh.height = n as u32;
        mesh.mesh_size = Vec2::splat(20.0);
        mesh
    }

    #[test]
    fn test_subtract_disjoint_volume_is_identity() {
        let mesh = grid_mesh();
        let before = (mesh.vertices.len(), mesh.triangle_count());
        // Tunnel far below the grid
        let tunnel = CylinderShape::new(Vec3::new(0.0, -100.0, 0.0), Vec3::Z, 20.0, 3.0);
        let out = subtract(mesh, &tunnel);
        assert_eq!((out.vertices.len(), out.triangle_count()), before);
    }

    #[test]
    fn test_subtract_enclosing_volume_empties() {
        let mesh = grid_mesh();
        let vertex_count = mesh.vertices.len();
        let tunnel = CylinderShape::new(Vec3::new(10.0, -500.0, 10.0), Vec3::Y, 1000.0, 500.0);
        let out = subtract(mesh, &tunnel);
        assert!(out.is_empty());
        // Emptiness means no triangles; the source vertex buffer is
        // carried over, not compacted
        assert_eq!(out.vertices.len(), vertex_count);
    }

    #[test]
    fn test_subtract_clips_straddling_triangles() {
        let mesh = grid_mesh();
        let before = mesh.triangle_count();
        // Vertical shaft through the middle of the grid
        let tunnel = CylinderShape::new(Vec3::new(10.0, -10.0, 10.0), Vec3::Y, 20.0, 4.0);
        let out = subtract(mesh, &tunnel);

        assert!(!out.is_empty());
        assert!(out.triangle_count() < before * 2);
        assert!(out.validate().is_ok());
        // Everything referenced by the output sits outside or on the
        // surface, within the bisection tolerance
        for &i in &out.indices {
            let d = tunnel.signed_distance(out.vertices[i as usize]);
            assert!(d >= -SURFACE_EPSILON * 5.0, "vertex {} inside: {}", i, d);
        }
    }

    #[test]
    fn test_subtract_preserves_grid_metadata() {
        let mesh = grid_mesh();
        let tunnel = CylinderShape::new(Vec3::new(10.0, -10.0, 10.0), Vec3::Y, 20.0, 4.0);
        let out = subtract(mesh, &tunnel);
        assert_eq!(out.width, 5);
        assert_eq!(out.height, 5);
        assert_eq!(out.mesh_size, Vec2::splat(20.0));
    }

    #[test]
    fn test_wall_grazing_vertex_keeps_seam_on_surface() {
        // A vertex a hair inside the wall classifies OnSurface and is
        // kept; both ends of its edge toward the interior have negative
        // signed distance, so bisection finds no crossing. The seam must
        // snap to the grazing endpoint rather than land mid-edge inside
        // the tunnel.
        let tunnel = CylinderShape::new(Vec3::ZERO, Vec3::Z, 20.0, 3.0);
        let mesh = MeshData::new(
            vec![
                Vec3::new(2.995, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 10.0),
                Vec3::new(6.0, 4.0, 10.0),
            ],
            vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            vec![0, 1, 2],
        );
        let out = subtract(mesh, &tunnel);

        assert!(!out.is_empty());
        assert!(out.validate().is_ok());
        for &i in &out.indices {
            let d = tunnel.signed_distance(out.vertices[i as usize]);
            assert!(d >= -SURFACE_EPSILON * 5.0, "vertex {} inside: {}", i, d);
        }
    }

    #[test]
    fn test_clip_interpolates_uvs() {
        // One triangle with a corner inside a shaft; the clip vertices
        // must carry interpolated UVs, not copies
        let mesh = MeshData::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 10.0),
            ],
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            vec![0, 1, 2],
        );
        let shaft = CylinderShape::new(Vec3::new(0.0, -10.0, 0.0), Vec3::Y, 20.0, 2.0);
        let out = subtract(mesh, &shaft);
        assert!(out.vertices.len() > 3);
        for (i, &uv) in out.uvs.iter().enumerate().skip(3) {
            assert!(uv.x > 0.0 || uv.y > 0.0, "clip uv {} not interpolated", i);
            assert!(uv.x < 1.0 && uv.y < 1.0);
        }
    }
}
