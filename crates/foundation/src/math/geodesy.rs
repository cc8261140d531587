//! Latitude/longitude conversions for the two world representations.
//!
//! Sphere convention: polar angle `phi = 90 - lat`, azimuth `theta = -lng`,
//! so increasing longitude turns towards the visual east. The mesh frame
//! inverts `y` relative to the textbook formula; its texture rows run from
//! north (v = 0) to south, which lines the imagery back up. Points placed on
//! top of the mesh (flight tracks, camera positions) use the non-inverted
//! [`to_display_point`].

use serde::{Deserialize, Serialize};

use super::Vec3;

/// Geographic coordinate in degrees: `lat` in `[-90, 90]`, `lng` in `[-180, 180)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The two spatial representations a coordinate can be laid out in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Sphere,
    Plane,
}

/// Mesh-frame sphere point (y inverted).
pub fn to_sphere_point(coord: LatLng, radius: f64) -> Vec3 {
    let phi = (90.0 - coord.lat).to_radians();
    let theta = (-coord.lng).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(
        radius * sin_phi * theta.cos(),
        -radius * cos_phi,
        radius * sin_phi * theta.sin(),
    )
}

/// Display-frame sphere point: same as [`to_sphere_point`] with `y` restored.
pub fn to_display_point(coord: LatLng, radius: f64) -> Vec3 {
    let p = to_sphere_point(coord, radius);
    Vec3::new(p.x, -p.y, p.z)
}

/// Equirectangular projection onto `x in [-radius, radius]`, `y in [-radius/2, radius/2]`, `z = 0`.
pub fn to_plane_point(coord: LatLng, radius: f64) -> Vec3 {
    let u = (coord.lng + 180.0) / 360.0;
    let v = (coord.lat + 90.0) / 180.0;
    Vec3::new((u * 2.0 - 1.0) * radius, (v - 0.5) * radius, 0.0)
}

/// Inverse of [`to_sphere_point`].
///
/// At the poles longitude is undefined; whatever `atan2` yields is returned.
/// The zero vector maps to `(0, 0)`.
pub fn sphere_to_lat_lng(p: Vec3) -> LatLng {
    let r = p.length();
    if r == 0.0 {
        return LatLng::new(0.0, 0.0);
    }
    let lat = 90.0 - (-p.y / r).clamp(-1.0, 1.0).acos().to_degrees();
    let lng = -p.z.atan2(p.x).to_degrees();
    LatLng::new(lat, normalize_lng(lng))
}

/// Fold a longitude into `[-180, 180)`.
pub fn normalize_lng(lng: f64) -> f64 {
    let folded = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if folded >= 180.0 { folded - 360.0 } else { folded }
}
