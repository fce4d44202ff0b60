//! Terrain-aware clipping of generated tunnel interiors
//!
//! A generated tunnel wall can poke through the ground wherever the tunnel
//! axis runs close to the surface. This pass drops triangles that are
//! entirely above the terrain height-field and clips straddling ones so
//! every surviving vertex sits at or below ground level, with clip seams
//! snapped exactly onto the terrain surface.

use crate::core::types::{Vec2, Vec3};
use crate::mesh::MeshData;
use crate::terrain::TerrainHeightQuerier;

/// Denominator magnitude below which an edge is treated as parallel to
/// the terrain and the crossing falls back to the edge midpoint
const PARALLEL_EPSILON: f32 = 1e-6;

/// Per-call clipping counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipStats {
    pub triangles_processed: usize,
    pub triangles_kept: usize,
    pub triangles_discarded: usize,
    pub triangles_clipped: usize,
    pub vertices_added: usize,
}

/// Clips meshes against a terrain height-field.
#[derive(Clone, Copy, Debug)]
pub struct TerrainClipper {
    /// A vertex counts as underground when `y < height + tolerance`
    pub tolerance: f32,
}

impl Default for TerrainClipper {
    fn default() -> Self {
        Self { tolerance: 0.01 }
    }
}

impl TerrainClipper {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Keep only the underground portion of `mesh`.
    pub fn clip(
        &self,
        mesh: MeshData,
        querier: &dyn TerrainHeightQuerier,
    ) -> (MeshData, ClipStats) {
        let mut stats = ClipStats::default();
        if mesh.is_empty() {
            return (mesh, stats);
        }

        // Terrain height and underground status per source vertex
        let heights: Vec<f32> = mesh
            .vertices
            .iter()
            .map(|v| querier.height_at(Vec2::new(v.x, v.z)))
            .collect();
        let underground: Vec<bool> = mesh
            .vertices
            .iter()
            .zip(&heights)
            .map(|(v, &h)| v.y < h + self.tolerance)
            .collect();

        let mut out = MeshData {
            vertices: mesh.vertices.clone(),
            uvs: mesh.uvs.clone(),
            indices: Vec::with_capacity(mesh.indices.len()),
            width: mesh.width,
            height: mesh.height,
            mesh_size: mesh.mesh_size,
        };

        for tri in mesh.indices.chunks_exact(3) {
            stats.triangles_processed += 1;
            let below = [
                underground[tri[0] as usize],
                underground[tri[1] as usize],
                underground[tri[2] as usize],
            ];
            match below.iter().filter(|&&b| b).count() {
                3 => {
                    stats.triangles_kept += 1;
                    out.indices.extend_from_slice(tri);
                }
                0 => stats.triangles_discarded += 1,
                _ => {
                    stats.triangles_clipped += 1;
                    self.clip_triangle(&mut out, &heights, tri, below, &mut stats);
                }
            }
        }

        log::debug!(
            "terrain clip: {} triangles -> kept {}, clipped {}, discarded {} (+{} vertices)",
            stats.triangles_processed,
            stats.triangles_kept,
            stats.triangles_clipped,
            stats.triangles_discarded,
            stats.vertices_added,
        );
        (out, stats)
    }

    /// Clip one straddling triangle against the terrain surface.
    fn clip_triangle(
        &self,
        out: &mut MeshData,
        heights: &[f32],
        tri: &[u32],
        below: [bool; 3],
        stats: &mut ClipStats,
    ) {
        let mut polygon: Vec<u32> = Vec::with_capacity(4);

        for edge in 0..3 {
            let a = edge;
            let b = (edge + 1) % 3;
            if below[a] {
                polygon.push(tri[a]);
            }
            if below[a] != below[b] {
                let va = out.vertices[tri[a] as usize];
                let vb = out.vertices[tri[b] as usize];
                let ha = heights[tri[a] as usize];
                let hb = heights[tri[b] as usize];

                // Crossing parameter in height-difference space: where the
                // edge's linear height meets the lerped terrain height
                let denominator = (vb.y - va.y) - (hb - ha);
                let t = if denominator.abs() < PARALLEL_EPSILON {
                    0.5
                } else {
                    ((ha - va.y) / denominator).clamp(0.0, 1.0)
                };

                // Snap the seam onto the terrain rather than the edge so
                // clipped geometry meets the ground exactly
                let terrain_y = ha + t * (hb - ha);
                let position = Vec3::new(
                    va.x + t * (vb.x - va.x),
                    terrain_y,
                    va.z + t * (vb.z - va.z),
                );

                let index = out.vertices.len() as u32;
                out.vertices.push(position);
                let ua = out.uvs[tri[a] as usize];
                let ub = out.uvs[tri[b] as usize];
                out.uvs.push(ua.lerp(ub, t));
                polygon.push(index);
                stats.vertices_added += 1;
            }
        }

        for i in 1..polygon.len().saturating_sub(1) {
            out.indices
                .extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
        }
    }
}
