//! Sphere/plane morph mesh.
//!
//! One `(lat_segments + 1) x (lng_segments + 1)` vertex grid serves both
//! representations. Row `i` runs from the north pole (`i = 0`) to the south
//! pole; column `j` from longitude -180 to 180. Every vertex is a linear blend
//! of its flat and spherical positions, so topology and UVs never change.

use foundation::math::{LatLng, Vec3, to_sphere_point};

/// Blend factor between the flat map (0) and the globe (1).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct MorphProgress(f64);

impl MorphProgress {
    pub const PLANE: Self = Self(0.0);
    pub const SPHERE: Self = Self(1.0);

    /// Clamps into `[0, 1]`; NaN becomes the sphere.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::SPHERE;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Moves at most `increment` towards `target` without overshooting.
    pub fn step_toward(self, target: Self, increment: f64) -> Self {
        let increment = increment.max(0.0);
        let delta = target.0 - self.0;
        if delta.abs() <= increment {
            target
        } else {
            Self::new(self.0 + increment.copysign(delta))
        }
    }
}

impl Default for MorphProgress {
    fn default() -> Self {
        Self::SPHERE
    }
}

/// Renderer-ready buffers for the morph mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphGrid {
    pub lat_segments: usize,
    pub lng_segments: usize,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MorphGrid {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

pub fn grid_lat_lng(i: usize, j: usize, lat_segments: usize, lng_segments: usize) -> LatLng {
    LatLng::new(
        90.0 - 180.0 * i as f64 / lat_segments as f64,
        -180.0 + 360.0 * j as f64 / lng_segments as f64,
    )
}

/// Texture coordinate of vertex `(i, j)`. Independent of morph progress.
pub fn grid_uv(i: usize, j: usize, lat_segments: usize, lng_segments: usize) -> [f32; 2] {
    [
        (j as f64 / lng_segments as f64) as f32,
        (i as f64 / lat_segments as f64) as f32,
    ]
}

/// Flat-map position of vertex `(i, j)`; rows run top to bottom like the texture.
pub fn flat_point(i: usize, j: usize, lat_segments: usize, lng_segments: usize) -> Vec3 {
    Vec3::new(
        2.0 * j as f64 / lng_segments as f64 - 1.0,
        i as f64 / lat_segments as f64 - 0.5,
        0.0,
    )
}

/// Builds the blended grid for `progress`. Zero segment counts are raised to 1.
pub fn generate_morph_grid(lat_segments: usize, lng_segments: usize, progress: MorphProgress) -> MorphGrid {
    let lat_segments = lat_segments.max(1);
    let lng_segments = lng_segments.max(1);
    let t = progress.value();
    let vertex_count = (lat_segments + 1) * (lng_segments + 1);

    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    for i in 0..=lat_segments {
        for j in 0..=lng_segments {
            let sphere = to_sphere_point(grid_lat_lng(i, j, lat_segments, lng_segments), 1.0);
            let flat = flat_point(i, j, lat_segments, lng_segments);
            positions.push(flat.lerp(sphere, t).to_f32());
            uvs.push(grid_uv(i, j, lat_segments, lng_segments));
        }
    }

    let row = lng_segments as u32 + 1;
    let mut indices = Vec::with_capacity(lat_segments * lng_segments * 6);
    for i in 0..lat_segments as u32 {
        for j in 0..lng_segments as u32 {
            let a = i * row + j;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    MorphGrid {
        lat_segments,
        lng_segments,
        positions,
        uvs,
        indices,
    }
}
