//! Terrain height-field boundary
//!
//! The carving core never stores a height-field. It asks an external
//! querier for the surface elevation at a world XZ position and treats the
//! answer as cheap, synchronous, and deterministic. Production queriers are
//! supplied by the terrain subsystem; [`ConstantHeight`] and [`NoiseHeight`]
//! exist so the crate is exercisable on its own.

use glam::Vec2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Queries terrain surface elevation at a world XZ position.
///
/// Must be deterministic for a given terrain state or clipping results
/// become non-reproducible.
pub trait TerrainHeightQuerier {
    fn height_at(&self, xz: Vec2) -> f32;
}

/// Flat terrain at a fixed elevation
#[derive(Clone, Copy, Debug)]
pub struct ConstantHeight(pub f32);

impl TerrainHeightQuerier for ConstantHeight {
    fn height_at(&self, _xz: Vec2) -> f32 {
        self.0
    }
}

/// Parameters for the noise-backed demo terrain
#[derive(Clone, Debug)]
pub struct NoiseHeightParams {
    pub seed: u32,
    /// Horizontal scale (larger = smoother)
    pub scale: f32,
    /// Vertical scale (max height)
    pub height_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
}

impl Default for NoiseHeightParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 64.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Fractal-noise height-field for demos and tests
pub struct NoiseHeight {
    params: NoiseHeightParams,
    noise: Fbm<Perlin>,
}

impl NoiseHeight {
    pub fn new(params: NoiseHeightParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    pub fn params(&self) -> &NoiseHeightParams {
        &self.params
    }
}

impl TerrainHeightQuerier for NoiseHeight {
    fn height_at(&self, xz: Vec2) -> f32 {
        let nx = (xz.x / self.params.scale) as f64;
        let nz = (xz.y / self.params.scale) as f64;

        // Noise value in [-1, 1] mapped to [0, height_scale]
        let noise_value = self.noise.get([nx, nz]);
        let normalized = (noise_value + 1.0) / 2.0;
        (normalized * self.params.height_scale as f64) as f32
    }
}
