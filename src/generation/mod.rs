//! Tunnel interior generation pipeline
//!
//! Orchestrates a single tunnel: shape -> raw ring mesh -> terrain-aware
//! clip -> degenerate-triangle cleanup, tagged with the processor that
//! produced it. Batch generation applies the same pipeline to each shape
//! independently; results never interact, so the batch is order-free.

pub mod config;

pub use config::GenerationConfig;

use crate::clip::{ClipStats, TerrainClipper};
use crate::mesh::{self, MeshData};
use crate::terrain::TerrainHeightQuerier;
use crate::volume::{TunnelShape, TunnelVolume};

/// Output of the interior pipeline for one tunnel
#[derive(Clone, Debug)]
pub struct GeneratedInterior {
    pub mesh: MeshData,
    /// Identifier of the processor that produced the mesh
    pub processor: String,
    pub stats: ClipStats,
}

impl GeneratedInterior {
    /// Empty result for inputs the pipeline rejects
    fn empty(processor: &str) -> Self {
        Self {
            mesh: MeshData::empty(),
            processor: processor.to_string(),
            stats: ClipStats::default(),
        }
    }
}

/// Runs the interior pipeline for tunnel shapes.
pub struct InteriorGenerator {
    config: GenerationConfig,
    clipper: TerrainClipper,
}

impl InteriorGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        let clipper = TerrainClipper::new(config.clip_tolerance);
        Self { config, clipper }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate the clipped, optimized interior mesh for one shape.
    ///
    /// Returns an empty result (and warns) when the shape's raw mesh has
    /// fewer vertices than the configured minimum; callers must check
    /// `mesh.is_empty()`.
    pub fn generate(
        &self,
        shape: &TunnelShape,
        querier: &dyn TerrainHeightQuerier,
    ) -> GeneratedInterior {
        let raw = shape.generate_interior_mesh(querier);
        if raw.vertices.len() < self.config.min_vertex_count {
            log::warn!(
                "interior generation: {} shape produced {} vertices (minimum {}), returning empty mesh",
                shape.variant_name(),
                raw.vertices.len(),
                self.config.min_vertex_count
            );
            return GeneratedInterior::empty(&self.config.processor);
        }

        let (clipped, stats) = if self.config.clip_to_terrain {
            self.clipper.clip(raw, querier)
        } else {
            (raw, ClipStats::default())
        };

        GeneratedInterior {
            mesh: mesh::optimize(clipped),
            processor: self.config.processor.clone(),
            stats,
        }
    }

    /// Generate interiors for a batch of shapes. Each shape runs the full
    /// pipeline independently; output order matches input order.
    pub fn generate_batch(
        &self,
        shapes: &[TunnelShape],
        querier: &dyn TerrainHeightQuerier,
    ) -> Vec<GeneratedInterior> {
        shapes
            .iter()
            .map(|shape| self.generate(shape, querier))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::terrain::ConstantHeight;
    use crate::volume::CylinderShape;

    fn tunnel() -> TunnelShape {
        TunnelShape::Cylinder(CylinderShape::new(Vec3::ZERO, Vec3::Z, 20.0, 3.0))
    }

    #[test]
    fn test_generate_fully_underground() {
        let generator = InteriorGenerator::new(GenerationConfig::default());
        let result = generator.generate(&tunnel(), &ConstantHeight(10.0));

        assert!(!result.mesh.is_empty());
        assert!(result.mesh.validate().is_ok());
        assert_eq!(result.processor, GenerationConfig::default().processor);
        // Shape centered at y = 0, terrain at 10: nothing to clip away
        assert_eq!(result.stats.triangles_discarded, 0);
        assert_eq!(result.stats.triangles_clipped, 0);
        for &v in &result.mesh.vertices {
            assert!(v.y < 10.0);
        }
    }

    #[test]
    fn test_generate_half_buried_clips_to_ground() {
        let generator = InteriorGenerator::new(GenerationConfig::default());
        // Terrain slices through the tube wall
        let result = generator.generate(&tunnel(), &ConstantHeight(1.5));

        assert!(!result.mesh.is_empty());
        assert!(result.stats.triangles_clipped > 0 || result.stats.triangles_discarded > 0);
        for &i in &result.mesh.indices {
            let v = result.mesh.vertices[i as usize];
            assert!(v.y <= 1.5 + generator.clipper.tolerance + 1e-4);
        }
    }

    #[test]
    fn test_generate_above_ground_returns_empty() {
        let generator = InteriorGenerator::new(GenerationConfig::default());
        // Terrain below the whole shape: every ring is pre-filtered and
        // the raw mesh misses the vertex minimum
        let result = generator.generate(&tunnel(), &ConstantHeight(-20.0));
        assert!(result.mesh.is_empty());
    }

    #[test]
    fn test_clip_toggle_off_keeps_raw_mesh() {
        let config = GenerationConfig {
            clip_to_terrain: false,
            ..GenerationConfig::default()
        };
        let generator = InteriorGenerator::new(config);
        let with_clip = InteriorGenerator::new(GenerationConfig::default());

        // Terrain slicing the tube: the unclipped result keeps vertices
        // above ground, the clipped one does not
        let raw = generator.generate(&tunnel(), &ConstantHeight(1.5));
        let clipped = with_clip.generate(&tunnel(), &ConstantHeight(1.5));
        assert!(raw.mesh.vertices.iter().any(|v| v.y > 1.6));
        assert!(clipped.mesh.vertices.len() > raw.mesh.vertices.len() || clipped.mesh.triangle_count() < raw.mesh.triangle_count());
    }

    #[test]
    fn test_generate_batch_matches_individual() {
        let generator = InteriorGenerator::new(GenerationConfig::default());
        let shapes = vec![
            tunnel(),
            TunnelShape::Cylinder(CylinderShape::new(
                Vec3::new(50.0, 0.0, 0.0),
                Vec3::X,
                10.0,
                2.0,
            )),
        ];
        let querier = ConstantHeight(10.0);
        let batch = generator.generate_batch(&shapes, &querier);
        assert_eq!(batch.len(), 2);
        for (shape, result) in shapes.iter().zip(&batch) {
            let single = generator.generate(shape, &querier);
            assert_eq!(single.mesh, result.mesh);
        }
    }

    #[test]
    fn test_result_is_optimized() {
        let generator = InteriorGenerator::new(GenerationConfig::default());
        let result = generator.generate(&tunnel(), &ConstantHeight(1.5));
        // Optimization already ran; a second pass must change nothing
        let again = crate::mesh::optimize(result.mesh.clone());
        assert_eq!(again, result.mesh);
    }
}
