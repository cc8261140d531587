use std::fmt;
use std::fs;
use std::path::Path;

use flight::LiftProfile;
use foundation::math::{LatLng, Vec3, to_display_point};
use serde::{Deserialize, Serialize};

use crate::render::LineStyle;

/// Tokyo, the fixed origin of every flight unless configured otherwise.
pub const DEFAULT_ORIGIN: LatLng = LatLng::new(35.6895, 139.6917);

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Camera limits and the fixed parameters of the view-mode transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub sphere_min_distance: f64,
    pub sphere_max_distance: f64,
    /// Distance from the globe centre when returning to sphere view.
    pub home_distance: f64,
    pub plane_min_distance: f64,
    /// Rectangle (width, height) the plane view dollies to fit.
    pub plane_rect: [f64; 2],
    /// Wait after re-centring before the morph to plane starts.
    pub align_delay_s: f64,
    pub fov_y_deg: f64,
    pub aspect: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sphere_min_distance: 1.2,
            sphere_max_distance: 3.0,
            home_distance: 2.0,
            plane_min_distance: 0.1,
            plane_rect: [2.0, 1.0],
            align_delay_s: 0.3,
            fov_y_deg: 50.0,
            aspect: 16.0 / 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub origin: LatLng,
    /// Fixed segment count for sphere tracks.
    pub arc_segments: usize,
    /// Fixed segment count for plane tracks.
    pub line_segments: usize,
    /// Marker speed in render units per second.
    pub speed: f64,
    pub ease_distance: f64,
    pub base_radius: f64,
    pub cruise_lift: f64,
    /// Latitude and longitude segments of the morph grid.
    pub mesh_segments: usize,
    /// Morph progress change per tick.
    pub morph_step: f64,
    pub camera: CameraConfig,
    pub outer_line: LineStyle,
    pub inner_line: LineStyle,
    pub texture: String,
    pub marker_asset: String,
    pub marker_scale: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            arc_segments: 128,
            line_segments: 128,
            speed: 0.2,
            ease_distance: 0.1,
            base_radius: 1.0,
            cruise_lift: 0.02,
            mesh_segments: 64,
            morph_step: 0.08,
            camera: CameraConfig::default(),
            outer_line: LineStyle::new([0x22, 0x22, 0x22], 0.007, false),
            inner_line: LineStyle::new([0xff, 0xff, 0x00], 0.005, true),
            texture: "earth_color.jpg".to_string(),
            marker_asset: "b787.glb".to_string(),
            marker_scale: 0.0015,
        }
    }
}

impl GlobeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&payload)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: GlobeConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return invalid(format!("speed must be positive, got {}", self.speed));
        }
        if self.arc_segments == 0 || self.line_segments == 0 || self.mesh_segments == 0 {
            return invalid("segment counts must be at least 1".to_string());
        }
        if !(self.morph_step > 0.0 && self.morph_step <= 1.0) {
            return invalid(format!("morph_step must be in (0, 1], got {}", self.morph_step));
        }
        if !(self.ease_distance >= 0.0) {
            return invalid(format!("ease_distance must not be negative, got {}", self.ease_distance));
        }
        let cam = &self.camera;
        if !(cam.sphere_min_distance > 0.0 && cam.sphere_min_distance <= cam.sphere_max_distance) {
            return invalid(format!(
                "sphere distance bounds inverted: {}..{}",
                cam.sphere_min_distance, cam.sphere_max_distance
            ));
        }
        if !(cam.plane_min_distance > 0.0) {
            return invalid("plane_min_distance must be positive".to_string());
        }
        if !(cam.plane_rect[0] > 0.0 && cam.plane_rect[1] > 0.0) {
            return invalid("plane_rect must have positive extent".to_string());
        }
        if !(cam.align_delay_s >= 0.0) {
            return invalid("align_delay_s must not be negative".to_string());
        }
        Ok(())
    }

    /// Camera rest position in sphere view: above the origin at `home_distance`.
    pub fn home_position(&self) -> Vec3 {
        to_display_point(self.origin, self.camera.home_distance)
    }

    pub fn lift_profile(&self) -> LiftProfile {
        LiftProfile {
            base_radius: self.base_radius,
            cruise_lift: self.cruise_lift,
            ease_distance: self.ease_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DEFAULT_ORIGIN, GlobeConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = GlobeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.arc_segments, 128);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = GlobeConfig::from_json_str(r#"{ "speed": 0.5, "camera": { "align_delay_s": 0.0 } }"#)
            .unwrap();
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.camera.align_delay_s, 0.0);
        assert_eq!(config.camera.sphere_max_distance, 3.0);
        assert_eq!(config.mesh_segments, 64);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = GlobeConfig::from_json_str(r#"{ "speed": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
        let err = GlobeConfig::from_json_str(r#"{ "morph_step": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
        let err = GlobeConfig::from_json_str(
            r#"{ "camera": { "sphere_min_distance": 4.0, "sphere_max_distance": 3.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = GlobeConfig::from_json_str("{ speed: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GlobeConfig::load("/nonexistent/globe.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn home_sits_above_the_origin() {
        let config = GlobeConfig::default();
        let home = config.home_position();
        assert!((home.length() - 2.0).abs() < 1e-12);
        // Tokyo is in the northern hemisphere and the western half of the display frame.
        assert!(home.y > 0.0 && home.x < 0.0);
    }

    #[test]
    fn lift_profile_mirrors_config() {
        let lift = GlobeConfig::default().lift_profile();
        assert_eq!(lift.cruise_radius(), 1.02);
    }
}
