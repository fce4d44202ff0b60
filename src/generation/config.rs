//! Interior pipeline configuration

/// Configuration for the tunnel interior pipeline.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Run the terrain-aware clip stage
    pub clip_to_terrain: bool,
    /// Underground tolerance handed to the clipper, world units
    pub clip_tolerance: f32,
    /// Raw meshes with fewer vertices than this are rejected
    pub min_vertex_count: usize,
    /// Identifier tagged onto generated results
    pub processor: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            clip_to_terrain: true,
            clip_tolerance: 0.01,
            min_vertex_count: 3,
            processor: "tunnel_interior".to_string(),
        }
    }
}
