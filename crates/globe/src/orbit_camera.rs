//! Orbit camera with smoothed transitions.
//!
//! The camera sits on a sphere around `target` described by azimuth, polar
//! angle and distance. Requests set goals; [`OrbitCamera::update`] eases the
//! current values towards them exponentially, clamped by the active
//! [`CameraConstraints`].

use std::f64::consts::{PI, TAU};

use foundation::math::Vec3;
use serde::Serialize;

use crate::camera::{CameraConstraints, CameraRig};
use crate::config::CameraConfig;

/// Smoothing rate for all animated values (higher = faster response).
const SMOOTHING: f64 = 8.0;

/// Remaining error below which a value snaps onto its goal.
const SETTLE_EPS: f64 = 1e-4;

/// Largest step `update` integrates at once.
const MAX_DT: f64 = 0.1;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct OrbitState {
    pub target: Vec3,
    pub azimuth: f64,
    pub polar: f64,
    pub distance: f64,
}

impl OrbitState {
    pub fn eye_position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    fn from_offset(target: Vec3, offset: Vec3) -> Self {
        let distance = offset.length();
        if distance == 0.0 {
            return Self {
                target,
                azimuth: 0.0,
                polar: PI / 2.0,
                distance: 0.0,
            };
        }
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            distance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    current: OrbitState,
    goal: OrbitState,
    constraints: CameraConstraints,
    fov_y_rad: f64,
    aspect: f64,
}

impl OrbitCamera {
    /// Camera at `home_distance` looking at the globe centre along `-Z`.
    pub fn new(config: &CameraConfig) -> Self {
        Self::with_home(config, Vec3::new(0.0, 0.0, config.home_distance))
    }

    /// Camera resting at `home`, looking at the globe centre.
    pub fn with_home(config: &CameraConfig, home: Vec3) -> Self {
        let constraints = CameraConstraints::sphere(config);
        let mut state = OrbitState::from_offset(Vec3::ZERO, home);
        state.distance = constraints.clamp_distance(state.distance);
        Self {
            current: state,
            goal: state,
            constraints,
            fov_y_rad: config.fov_y_deg.to_radians(),
            aspect: config.aspect.max(1e-6),
        }
    }

    /// Advance the animation by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        let alpha = 1.0 - (-SMOOTHING * dt).exp();
        let ease = |from: f64, to: f64| {
            let next = from + (to - from) * alpha;
            if (to - next).abs() < SETTLE_EPS { to } else { next }
        };

        let target = self.current.target.lerp(self.goal.target, alpha);
        self.current.target = if target.distance(self.goal.target) < SETTLE_EPS {
            self.goal.target
        } else {
            target
        };
        self.current.azimuth = ease(self.current.azimuth, self.goal.azimuth);
        self.current.polar = ease(self.current.polar, self.goal.polar);
        self.current.distance = ease(self.current.distance, self.goal.distance);
    }

    pub fn state(&self) -> OrbitState {
        self.current
    }

    pub fn goal(&self) -> OrbitState {
        self.goal
    }

    pub fn eye_position(&self) -> Vec3 {
        self.current.eye_position()
    }

    pub fn forward_direction(&self) -> Vec3 {
        (self.current.target - self.eye_position()).normalize_or_zero()
    }

    /// Shift the current azimuth by whole turns so the animation takes the short way round.
    fn unwind_azimuth(&mut self) {
        let delta = self.goal.azimuth - self.current.azimuth;
        let turns = ((delta + PI) / TAU).floor();
        self.current.azimuth += turns * TAU;
    }

    fn clamp_goal(&mut self) {
        let c = self.constraints;
        self.goal.azimuth = c.clamp_azimuth(self.goal.azimuth);
        self.goal.polar = c.clamp_polar(self.goal.polar);
        self.goal.distance = c.clamp_distance(self.goal.distance);
    }
}

impl CameraRig for OrbitCamera {
    fn set_target(&mut self, target: Vec3) {
        self.goal.target = target;
    }

    fn rotate_to(&mut self, azimuth: f64, polar: f64) {
        self.goal.azimuth = azimuth;
        self.goal.polar = polar;
        self.clamp_goal();
        self.unwind_azimuth();
    }

    fn dolly_to(&mut self, distance: f64) {
        self.goal.distance = distance;
        self.clamp_goal();
    }

    fn set_position(&mut self, position: Vec3) {
        let orbit = OrbitState::from_offset(self.goal.target, position - self.goal.target);
        self.goal = orbit;
        self.clamp_goal();
        self.unwind_azimuth();
    }

    fn distance_to_fit(&self, width: f64, height: f64) -> f64 {
        let rect_aspect = width / height;
        let height_to_fit = if rect_aspect < self.aspect {
            height
        } else {
            width / self.aspect
        };
        height_to_fit * 0.5 / (self.fov_y_rad * 0.5).tan()
    }

    fn constraints(&self) -> CameraConstraints {
        self.constraints
    }

    fn set_constraints(&mut self, constraints: CameraConstraints) {
        self.constraints = constraints;
        self.clamp_goal();
    }

    fn is_settled(&self) -> bool {
        self.current == self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::OrbitCamera;
    use crate::camera::{CameraConstraints, CameraRig};
    use crate::config::CameraConfig;
    use foundation::math::Vec3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn settle(camera: &mut OrbitCamera) -> usize {
        for frame in 0..10_000 {
            if camera.is_settled() {
                return frame;
            }
            camera.update(1.0 / 60.0);
        }
        panic!("camera never settled");
    }

    #[test]
    fn starts_settled_at_home() {
        let camera = OrbitCamera::new(&CameraConfig::default());
        assert!(camera.is_settled());
        let eye = camera.eye_position();
        assert_close(eye.z, 2.0, 1e-12);
        assert_close(eye.x, 0.0, 1e-12);
        assert_close(eye.y, 0.0, 1e-12);
    }

    #[test]
    fn custom_home_is_the_resting_eye() {
        let home = Vec3::new(-1.2, 1.1, -1.0);
        let camera = OrbitCamera::with_home(&CameraConfig::default(), home);
        assert!(camera.is_settled());
        let eye = camera.eye_position();
        assert!(eye.distance(home) < 1e-12, "eye {eye:?} != home {home:?}");
    }

    #[test]
    fn dolly_is_clamped_and_animated() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.dolly_to(10.0);
        assert!(!camera.is_settled());
        camera.update(1.0 / 60.0);
        let d = camera.state().distance;
        assert!(d > 2.0 && d < 3.0, "distance {d}");
        settle(&mut camera);
        assert_eq!(camera.state().distance, 3.0);
    }

    #[test]
    fn set_position_is_reached_through_the_orbit() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.set_position(Vec3::new(0.0, 2.0, 0.0) * 0.9);
        settle(&mut camera);
        let eye = camera.eye_position();
        assert_close(eye.y, 1.8, 1e-9);
        assert_close(camera.state().polar, 0.0, 1e-9);
    }

    #[test]
    fn rotation_takes_the_short_way_round() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.rotate_to(PI - 0.1, FRAC_PI_2);
        settle(&mut camera);
        camera.rotate_to(-PI + 0.1, FRAC_PI_2);
        camera.update(1.0 / 60.0);
        // Unwound by a full turn instead of sweeping back through zero.
        let az = camera.state().azimuth;
        assert!(az < -PI && az > -PI - 0.1, "azimuth {az}");
        settle(&mut camera);
        assert_close(camera.state().azimuth, -PI + 0.1, 1e-12);
    }

    #[test]
    fn locked_constraints_pin_the_angles() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.set_constraints(CameraConstraints::plane_locked(0.1, 1.0));
        camera.rotate_to(1.0, 0.3);
        settle(&mut camera);
        assert_eq!(camera.state().azimuth, 0.0);
        assert_eq!(camera.state().polar, FRAC_PI_2);
        assert_eq!(camera.state().distance, 1.0);
    }

    #[test]
    fn fit_distance_grows_with_the_rectangle() {
        let camera = OrbitCamera::new(&CameraConfig::default());
        let small = camera.distance_to_fit(1.0, 0.5);
        let large = camera.distance_to_fit(2.0, 1.0);
        assert_close(large, small * 2.0, 1e-12);
        // Wide aspect: a 2x1 rectangle is width-limited at 16:9.
        let fov = 50f64.to_radians();
        assert_close(large, (2.0 / (16.0 / 9.0)) * 0.5 / (fov * 0.5).tan(), 1e-12);
    }

    #[test]
    fn negative_and_non_finite_dt_do_not_move() {
        let mut camera = OrbitCamera::new(&CameraConfig::default());
        camera.dolly_to(1.2);
        camera.update(-1.0);
        camera.update(f64::NAN);
        assert_eq!(camera.state().distance, 2.0);
    }
}
