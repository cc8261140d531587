//! The seam to whatever draws the scene.
//!
//! The scene owns geometry lifetimes through a handle registry and tells the
//! backend what to create, update and drop. Backends never decide lifetimes.

use flight::TrackSample;
use foundation::handles::Handle;
use foundation::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::morph::MorphGrid;

/// What a registry handle refers to on the backend side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    MorphMesh,
    OuterLine,
    InnerLine,
}

/// Stroke for one pass of a flight line.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: [u8; 3],
    pub width: f64,
    /// The dark outline is drawn without depth testing so it never z-fights
    /// with the globe surface.
    pub depth_test: bool,
}

impl LineStyle {
    pub const fn new(color: [u8; 3], width: f64, depth_test: bool) -> Self {
        Self {
            color,
            width,
            depth_test,
        }
    }
}

/// Where and how the aircraft marker is drawn this frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MarkerPose {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f64,
}

impl MarkerPose {
    pub fn from_sample(sample: TrackSample, scale: f64) -> Self {
        Self {
            position: sample.position,
            orientation: sample.orientation,
            scale,
        }
    }
}

pub trait RenderBackend {
    fn upload_mesh(&mut self, handle: Handle, grid: &MorphGrid, texture: &str);
    fn update_mesh(&mut self, handle: Handle, grid: &MorphGrid);
    fn upload_line(&mut self, handle: Handle, points: &[Vec3], style: &LineStyle);
    fn release(&mut self, handle: Handle);
    /// `None` hides the marker.
    fn set_marker(&mut self, asset: &str, pose: Option<MarkerPose>);
}

/// Backend that draws nothing. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn upload_mesh(&mut self, _handle: Handle, _grid: &MorphGrid, _texture: &str) {}
    fn update_mesh(&mut self, _handle: Handle, _grid: &MorphGrid) {}
    fn upload_line(&mut self, _handle: Handle, _points: &[Vec3], _style: &LineStyle) {}
    fn release(&mut self, _handle: Handle) {}
    fn set_marker(&mut self, _asset: &str, _pose: Option<MarkerPose>) {}
}
