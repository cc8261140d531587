use std::f64::consts::{FRAC_PI_2, PI};

use foundation::math::Vec3;

use crate::config::CameraConfig;

/// Limits a camera enforces on its animated orbit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConstraints {
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_azimuth: f64,
    pub max_azimuth: f64,
    pub min_polar: f64,
    pub max_polar: f64,
    /// Dollying zooms towards the cursor instead of the target.
    pub dolly_to_cursor: bool,
}

impl CameraConstraints {
    /// Free orbit around the globe.
    pub fn sphere(config: &CameraConfig) -> Self {
        Self {
            min_distance: config.sphere_min_distance,
            max_distance: config.sphere_max_distance,
            min_azimuth: f64::NEG_INFINITY,
            max_azimuth: f64::INFINITY,
            min_polar: 0.0,
            max_polar: PI,
            dolly_to_cursor: false,
        }
    }

    /// Head-on view of the flat map, only panning distance left free.
    pub fn plane_locked(min_distance: f64, max_distance: f64) -> Self {
        Self {
            min_distance,
            max_distance,
            min_azimuth: 0.0,
            max_azimuth: 0.0,
            min_polar: FRAC_PI_2,
            max_polar: FRAC_PI_2,
            dolly_to_cursor: true,
        }
    }

    pub fn clamp_distance(&self, distance: f64) -> f64 {
        distance.clamp(self.min_distance, self.max_distance.max(self.min_distance))
    }

    pub fn clamp_azimuth(&self, azimuth: f64) -> f64 {
        azimuth.clamp(self.min_azimuth, self.max_azimuth.max(self.min_azimuth))
    }

    pub fn clamp_polar(&self, polar: f64) -> f64 {
        polar.clamp(self.min_polar, self.max_polar.max(self.min_polar))
    }
}

/// The camera surface the view-mode controller drives.
///
/// Angles follow the orbit convention: `azimuth` around `+Y` measured from
/// `+Z`, `polar` down from `+Y`. Movement requests may animate; `is_settled`
/// reports when the last one has finished.
pub trait CameraRig {
    fn set_target(&mut self, target: Vec3);
    fn rotate_to(&mut self, azimuth: f64, polar: f64);
    fn dolly_to(&mut self, distance: f64);
    fn set_position(&mut self, position: Vec3);
    /// Distance at which a `width x height` rectangle facing the camera fills the view.
    fn distance_to_fit(&self, width: f64, height: f64) -> f64;
    fn constraints(&self) -> CameraConstraints;
    fn set_constraints(&mut self, constraints: CameraConstraints);
    fn is_settled(&self) -> bool;
}
