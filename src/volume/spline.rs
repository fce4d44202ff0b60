//! Spline-following tunnel shape

use crate::core::error::Error;
use crate::core::types::{Vec3, Mat4, Result};
use crate::mesh::MeshData;
use crate::terrain::TerrainHeightQuerier;
use super::rings::{axis_basis, RingMeshBuilder};
use super::{ImplicitVolume, TunnelVolume};

/// One baked point on the tunnel path
#[derive(Clone, Copy, Debug)]
struct PathSample {
    position: Vec3,
    tangent: Vec3,
    up: Vec3,
}

/// Tunnel following a 3-D polyline path with a constant radius.
///
/// The control polyline is baked once at construction into `bake_count`
/// samples spaced uniformly by arc length, with parallel-transported up
/// vectors. `signed_distance` is the minimum over all baked samples of
/// `dist(p, sample) - radius`: an O(bake_count) approximation of the true
/// distance-to-curve whose worst-case radial error is about half the
/// inter-sample spacing (`path_length / (2 * bake_count)`). Raise
/// `bake_count` for accuracy, lower it for cheaper queries.
#[derive(Clone, Debug)]
pub struct SplineShape {
    pub radius: f32,
    pub bake_count: usize,
    pub radial_segments: u32,
    pub length_segments: u32,
    samples: Vec<PathSample>,
    total_length: f32,
}

impl SplineShape {
    pub const DEFAULT_BAKE_COUNT: usize = 100;

    /// Bake a control polyline. Needs at least two distinct points.
    pub fn new(control_points: &[Vec3], radius: f32, bake_count: usize) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(Error::InvalidShape(format!(
                "spline path needs at least 2 control points, got {}",
                control_points.len()
            )));
        }
        let bake_count = bake_count.max(2);

        // Cumulative arc length along the control polyline
        let mut cumulative = Vec::with_capacity(control_points.len());
        let mut total = 0.0f32;
        cumulative.push(0.0);
        for pair in control_points.windows(2) {
            total += (pair[1] - pair[0]).length();
            cumulative.push(total);
        }
        if total <= f32::EPSILON {
            return Err(Error::InvalidShape(
                "spline path has zero length".to_string(),
            ));
        }

        // Resample uniformly by arc length
        let mut positions = Vec::with_capacity(bake_count);
        let mut segment = 0usize;
        for i in 0..bake_count {
            let target = i as f32 / (bake_count - 1) as f32 * total;
            while segment + 2 < cumulative.len() && cumulative[segment + 1] < target {
                segment += 1;
            }
            let span = cumulative[segment + 1] - cumulative[segment];
            let f = if span > f32::EPSILON {
                (target - cumulative[segment]) / span
            } else {
                0.0
            };
            positions.push(control_points[segment].lerp(control_points[segment + 1], f));
        }

        // Tangents by central difference, one-sided at the ends
        let n = positions.len();
        let mut samples = Vec::with_capacity(n);
        for i in 0..n {
            let prev = positions[i.saturating_sub(1)];
            let next = positions[(i + 1).min(n - 1)];
            let tangent = (next - prev).normalize_or_zero();
            let tangent = if tangent == Vec3::ZERO { Vec3::Z } else { tangent };
            samples.push(PathSample {
                position: positions[i],
                tangent,
                up: Vec3::ZERO,
            });
        }

        // Parallel transport the up vector along the path so rings do not
        // twist at direction changes
        let mut up = axis_basis(samples[0].tangent).1;
        for sample in samples.iter_mut() {
            let projected = up - sample.tangent * up.dot(sample.tangent);
            up = if projected.length_squared() > 1e-8 {
                projected.normalize()
            } else {
                axis_basis(sample.tangent).1
            };
            sample.up = up;
        }

        Ok(Self {
            radius,
            bake_count,
            radial_segments: 16,
            length_segments: 20,
            samples,
            total_length: total,
        })
    }

    pub fn origin(&self) -> Vec3 {
        self.samples[0].position
    }

    pub fn direction(&self) -> Vec3 {
        self.samples[0].tangent
    }

    pub fn length(&self) -> f32 {
        self.total_length
    }

    /// Interpolated path sample at t in [0, 1]
    fn sample_at(&self, t: f32) -> PathSample {
        let scaled = t.clamp(0.0, 1.0) * (self.samples.len() - 1) as f32;
        let i = (scaled as usize).min(self.samples.len() - 2);
        let f = scaled - i as f32;
        let a = self.samples[i];
        let b = self.samples[i + 1];
        let tangent = a.tangent.lerp(b.tangent, f).normalize_or_zero();
        let tangent = if tangent == Vec3::ZERO { a.tangent } else { tangent };
        let up = a.up.lerp(b.up, f).normalize_or_zero();
        let up = if up == Vec3::ZERO { a.up } else { up };
        PathSample {
            position: a.position.lerp(b.position, f),
            tangent,
            up,
        }
    }
}

impl ImplicitVolume for SplineShape {
    /// Minimum distance to any baked sample, minus the radius.
    fn signed_distance(&self, p: Vec3) -> f32 {
        let mut best = f32::MAX;
        for sample in &self.samples {
            let d = (p - sample.position).length_squared();
            if d < best {
                best = d;
            }
        }
        best.sqrt() - self.radius
    }

    fn debug_mesh(&self) -> (MeshData, Mat4) {
        let mut builder = RingMeshBuilder::new(6, 8);
        for ring in 0..=8 {
            let sample = self.sample_at(ring as f32 / 8.0);
            let right = sample.up.cross(sample.tangent).normalize();
            builder.push_ring(ring, sample.position, right, sample.up, |_, _| self.radius);
        }
        (builder.build(), Mat4::IDENTITY)
    }
}

impl TunnelVolume for SplineShape {
    /// Rings follow the baked path. Every ring is emitted; terrain
    /// filtering is deferred entirely to the terrain-aware clip stage.
    fn generate_interior_mesh(&self, _querier: &dyn TerrainHeightQuerier) -> MeshData {
        let mut builder = RingMeshBuilder::new(self.radial_segments, self.length_segments);
        for ring in 0..=self.length_segments as i32 {
            let t = ring as f32 / self.length_segments as f32;
            let sample = self.sample_at(t);
            let right = sample.up.cross(sample.tangent).normalize();
            builder.push_ring(ring, sample.position, right, sample.up, |_, _| self.radius);
        }
        builder.build()
    }
}
