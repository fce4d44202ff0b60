//! Natural cave tunnel shape

use noise::{NoiseFn, Perlin};

use crate::core::types::{Vec2, Vec3, Mat4};
use crate::mesh::MeshData;
use crate::terrain::TerrainHeightQuerier;
use super::rings::{axis_basis, axis_frame, RingMeshBuilder};
use super::{ImplicitVolume, TunnelVolume};

/// Radial surface perturbation amplitude (fraction of the local radius).
/// Fixed at 10% independent of `radius_variation`; downstream visual tuning
/// depends on the two staying decoupled.
const SURFACE_NOISE_AMPLITUDE: f32 = 0.1;

/// Cave-like tunnel: a capped cylinder whose radius swells and narrows
/// along the axis via 1-D coherent noise, with ring vertices additionally
/// perturbed by 2-D noise for non-circular cross-sections.
#[derive(Clone)]
pub struct CaveShape {
    pub origin: Vec3,
    /// Unit axis from origin toward the far end
    pub direction: Vec3,
    pub length: f32,
    pub base_radius: f32,
    /// Fractional swing of the radius curve around `base_radius`
    pub radius_variation: f32,
    /// Noise frequency over the normalized axial parameter
    pub frequency: f32,
    pub seed: u32,
    pub radial_segments: u32,
    pub length_segments: u32,
    noise: Perlin,
}

impl CaveShape {
    pub fn new(
        origin: Vec3,
        direction: Vec3,
        length: f32,
        base_radius: f32,
        radius_variation: f32,
        seed: u32,
    ) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            length,
            base_radius,
            radius_variation,
            frequency: 3.0,
            seed,
            radial_segments: 16,
            length_segments: 20,
            noise: Perlin::new(seed),
        }
    }

    /// Perlin sample mapped from [-1, 1] to [0, 1]
    fn noise01(&self, x: f32, y: f32) -> f32 {
        let n = self.noise.get([x as f64, y as f64]) as f32;
        (n + 1.0) * 0.5
    }

    /// Radius at normalized axial position t in [0, 1]:
    /// `base * (1 + n(t) * variation - variation / 2)`, symmetric about
    /// `base` since n is in [0, 1].
    pub fn radius_at(&self, t: f32) -> f32 {
        let n = self.noise01(t * self.frequency, 0.5);
        self.base_radius * (1.0 + n * self.radius_variation - self.radius_variation * 0.5)
    }

    /// Per-vertex radius: the axial radius curve perturbed by 2-D surface
    /// noise over (angle, axial) coordinates.
    fn surface_radius(&self, t: f32, u: f32) -> f32 {
        let ring_radius = self.radius_at(t);
        let n = self.noise01(u * self.frequency * 2.0 + 17.0, t * self.frequency * 2.0);
        ring_radius * (1.0 + n * SURFACE_NOISE_AMPLITUDE - SURFACE_NOISE_AMPLITUDE * 0.5)
    }
}

impl std::fmt::Debug for CaveShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaveShape")
            .field("origin", &self.origin)
            .field("direction", &self.direction)
            .field("length", &self.length)
            .field("base_radius", &self.base_radius)
            .field("radius_variation", &self.radius_variation)
            .field("frequency", &self.frequency)
            .field("seed", &self.seed)
            .field("radial_segments", &self.radial_segments)
            .field("length_segments", &self.length_segments)
            .finish()
    }
}

impl ImplicitVolume for CaveShape {
    /// Capped-cylinder SDF with the radius sampled from the axial noise
    /// curve. Approximate where the radius curve slopes, exact in the
    /// radial/cap combination.
    fn signed_distance(&self, p: Vec3) -> f32 {
        let rel = p - self.origin;
        let axial = rel.dot(self.direction);
        let radial = (rel - self.direction * axial).length();

        let t = (axial / self.length).clamp(0.0, 1.0);
        let radial_sd = radial - self.radius_at(t);
        let cap_sd = (-axial).max(axial - self.length);
        if radial_sd < 0.0 && cap_sd < 0.0 {
            radial_sd.max(cap_sd)
        } else {
            (radial_sd.max(0.0).powi(2) + cap_sd.max(0.0).powi(2)).sqrt()
        }
    }

    fn debug_mesh(&self) -> (MeshData, Mat4) {
        // Coarse tube tracing the radius curve, surface noise left out
        let mut builder = RingMeshBuilder::new(8, 4);
        for ring in 0..=4 {
            let t = ring as f32 / 4.0;
            let center = Vec3::new(0.0, 0.0, t * self.length);
            builder.push_ring(ring, center, Vec3::X, Vec3::Y, |_, _| self.radius_at(t));
        }
        (builder.build(), axis_frame(self.origin, self.direction))
    }
}

impl TunnelVolume for CaveShape {
    /// Rings along the axis with per-vertex noise perturbation; rings whose
    /// center is at or above the terrain surface are skipped.
    fn generate_interior_mesh(&self, querier: &dyn TerrainHeightQuerier) -> MeshData {
        let (right, up) = axis_basis(self.direction);
        let mut builder = RingMeshBuilder::new(self.radial_segments, self.length_segments);

        for ring in 0..=self.length_segments as i32 {
            let t = ring as f32 / self.length_segments as f32;
            let center = self.origin + self.direction * (t * self.length);
            let ground = querier.height_at(Vec2::new(center.x, center.z));
            if center.y >= ground {
                continue;
            }
            let radial_segments = self.radial_segments;
            builder.push_ring(ring, center, right, up, |col, _| {
                let u = col as f32 / radial_segments as f32;
                self.surface_radius(t, u)
            });
        }
        builder.build()
    }
}
