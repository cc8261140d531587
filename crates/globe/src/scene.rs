//! The flight scene: one origin, at most one selected destination, the morph
//! mesh and the marker, kept consistent with the current view mode.
//!
//! Per frame, in order:
//! 1. the view-mode controller advances and steps the morph;
//! 2. the flight track is rebuilt if the surface changed;
//! 3. the mesh is regenerated if the morph moved;
//! 4. the follower ticks and the marker pose is emitted.

use std::fmt;

use flight::{FlightTrack, LiftProfile, PathFollower, generate_path};
use foundation::handles::Handle;
use foundation::math::{LatLng, Surface};
use runtime::{Frame, FrameClock, GeometryRegistry, ResourceError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::camera::CameraRig;
use crate::config::{ConfigError, GlobeConfig};
use crate::morph::{MorphProgress, generate_morph_grid};
use crate::render::{GeometryKind, LineStyle, MarkerPose, RenderBackend};
use crate::trips::{SelectionError, Trip, selected_destination};
use crate::view_mode::{ViewMode, ViewModeController, ViewModeError, ViewState};

#[derive(Debug)]
pub enum SceneError {
    Config(ConfigError),
    Selection(SelectionError),
    Resource(ResourceError),
    ViewMode(ViewModeError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Config(err) => write!(f, "{err}"),
            SceneError::Selection(err) => write!(f, "{err}"),
            SceneError::Resource(err) => write!(f, "{err}"),
            SceneError::ViewMode(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<ConfigError> for SceneError {
    fn from(err: ConfigError) -> Self {
        SceneError::Config(err)
    }
}

impl From<SelectionError> for SceneError {
    fn from(err: SelectionError) -> Self {
        SceneError::Selection(err)
    }
}

impl From<ResourceError> for SceneError {
    fn from(err: ResourceError) -> Self {
        SceneError::Resource(err)
    }
}

impl From<ViewModeError> for SceneError {
    fn from(err: ViewModeError) -> Self {
        SceneError::ViewMode(err)
    }
}

/// What happened in one [`FlightScene::frame`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub time_s: f64,
    pub state: ViewState,
    pub view: ViewMode,
    pub morph: f64,
    pub progress: Option<f64>,
    pub marker: Option<MarkerPose>,
}

#[derive(Debug, Clone, Copy)]
struct MeshGeometry {
    handle: Handle,
    progress: MorphProgress,
}

#[derive(Debug, Clone)]
struct ActiveFlight {
    destination: LatLng,
    surface: Surface,
    follower: PathFollower,
    lines: Vec<Handle>,
}

pub struct FlightScene {
    config: GlobeConfig,
    lift: LiftProfile,
    view: ViewModeController,
    clock: FrameClock,
    registry: GeometryRegistry<GeometryKind>,
    mesh: Option<MeshGeometry>,
    flight: Option<ActiveFlight>,
}

impl FlightScene {
    pub fn new(config: GlobeConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let lift = config.lift_profile();
        let view = ViewModeController::new(config.camera.clone(), config.morph_step, config.home_position());
        Ok(Self {
            config,
            lift,
            view,
            clock: FrameClock::new(),
            registry: GeometryRegistry::new(),
            mesh: None,
            flight: None,
        })
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewModeController {
        &self.view
    }

    pub fn destination(&self) -> Option<LatLng> {
        self.flight.as_ref().map(|f| f.destination)
    }

    pub fn follower(&self) -> Option<&PathFollower> {
        self.flight.as_ref().map(|f| &f.follower)
    }

    /// Geometry handles currently owned by the scene.
    pub fn live_count(&self) -> usize {
        self.registry.live_count()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.clock.last()
    }

    /// Replaces the flight with one to `destination`, or clears it.
    ///
    /// The new track is built before anything is released, so the scene never
    /// holds a follower without its path or lines from two flights.
    pub fn select_destination<B: RenderBackend + ?Sized>(
        &mut self,
        destination: Option<LatLng>,
        backend: &mut B,
    ) -> Result<(), SceneError> {
        let surface = self.view.mode();
        let follower = destination.map(|d| PathFollower::new(self.build_track(d, surface)));

        if let Some(old) = self.flight.take() {
            release_all(&mut self.registry, backend, &old.lines)?;
        }
        match (destination, follower) {
            (Some(destination), Some(follower)) => {
                let lines = upload_track(&mut self.registry, backend, follower.track(), &self.config);
                info!(
                    "flight selected: ({:.4},{:.4}) -> ({:.4},{:.4}), {:.1}s per loop",
                    self.config.origin.lat,
                    self.config.origin.lng,
                    destination.lat,
                    destination.lng,
                    follower.track().duration()
                );
                self.flight = Some(ActiveFlight {
                    destination,
                    surface,
                    follower,
                    lines,
                });
            }
            _ => {
                info!("flight cleared");
                backend.set_marker(&self.config.marker_asset, None);
            }
        }
        Ok(())
    }

    /// Selects `trips[index]`, or clears the selection for `None`.
    ///
    /// An out-of-range index leaves the current flight untouched.
    pub fn select_trip<T: Trip, B: RenderBackend + ?Sized>(
        &mut self,
        trips: &[T],
        index: Option<usize>,
        backend: &mut B,
    ) -> Result<(), SceneError> {
        let destination = selected_destination(trips, index).inspect_err(|err| warn!("{err}"))?;
        self.select_destination(destination, backend)
    }

    pub fn toggle_view<C: CameraRig + ?Sized>(&mut self, camera: &mut C) -> Result<ViewState, SceneError> {
        Ok(self.view.toggle(camera)?)
    }

    pub fn frame<C: CameraRig + ?Sized, B: RenderBackend + ?Sized>(
        &mut self,
        dt_s: f64,
        camera: &mut C,
        backend: &mut B,
    ) -> Result<FrameReport, SceneError> {
        let frame = self.clock.tick(dt_s);
        let state = self.view.advance(frame.dt_s, camera);
        self.sync_surface(backend)?;
        self.sync_mesh(backend);

        let scale = self.config.marker_scale;
        let (progress, marker) = match self.flight.as_mut() {
            Some(flight) => {
                flight.follower.tick(frame.dt_s);
                let marker = flight
                    .follower
                    .pose()
                    .map(|sample| MarkerPose::from_sample(sample, scale));
                (Some(flight.follower.progress()), marker)
            }
            None => (None, None),
        };
        if self.flight.is_some() {
            backend.set_marker(&self.config.marker_asset, marker);
        }

        Ok(FrameReport {
            frame: frame.index,
            time_s: frame.time.seconds(),
            state,
            view: self.view.view_mode(),
            morph: self.view.morph_progress().value(),
            progress,
            marker,
        })
    }

    /// Releases every geometry the scene owns, exactly once.
    ///
    /// Returns the number of handles released. The scene can be reused
    /// afterwards; the mesh is re-uploaded on the next frame.
    pub fn teardown<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<usize, SceneError> {
        self.flight = None;
        self.mesh = None;
        let live: Vec<Handle> = self.registry.live().into_iter().map(|(h, _)| h).collect();
        release_all(&mut self.registry, backend, &live)?;
        backend.set_marker(&self.config.marker_asset, None);
        info!(released = live.len(), "scene torn down");
        Ok(live.len())
    }

    fn build_track(&self, destination: LatLng, surface: Surface) -> FlightTrack {
        let segments = match surface {
            Surface::Sphere => self.config.arc_segments,
            Surface::Plane => self.config.line_segments,
        };
        let path = generate_path(self.config.origin, destination, Some(segments));
        FlightTrack::for_surface(surface, &path, &self.lift, self.config.speed)
    }

    /// Moves the flight onto the current surface. The marker restarts from the
    /// origin, as a freshly selected flight would.
    fn sync_surface<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), SceneError> {
        let surface = self.view.mode();
        let Some(destination) = self
            .flight
            .as_ref()
            .filter(|f| f.surface != surface)
            .map(|f| f.destination)
        else {
            return Ok(());
        };
        let track = self.build_track(destination, surface);
        let Some(flight) = self.flight.as_mut() else {
            return Ok(());
        };
        release_all(&mut self.registry, backend, &flight.lines)?;
        flight.lines = upload_track(&mut self.registry, backend, &track, &self.config);
        flight.follower.replace_track(track);
        flight.surface = surface;
        debug!(?surface, "flight track rebuilt");
        Ok(())
    }

    fn sync_mesh<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        let progress = self.view.morph_progress();
        let segments = self.config.mesh_segments;
        match self.mesh.as_mut() {
            None => {
                let handle = self.registry.allocate(GeometryKind::MorphMesh);
                let grid = generate_morph_grid(segments, segments, progress);
                backend.upload_mesh(handle, &grid, &self.config.texture);
                self.mesh = Some(MeshGeometry { handle, progress });
            }
            Some(mesh) if mesh.progress != progress => {
                let grid = generate_morph_grid(segments, segments, progress);
                backend.update_mesh(mesh.handle, &grid);
                mesh.progress = progress;
            }
            Some(_) => {}
        }
    }
}

/// Uploads every polyline of `track` twice: dark outline first, then the line.
fn upload_track<B: RenderBackend + ?Sized>(
    registry: &mut GeometryRegistry<GeometryKind>,
    backend: &mut B,
    track: &FlightTrack,
    config: &GlobeConfig,
) -> Vec<Handle> {
    let passes: [(GeometryKind, &LineStyle); 2] = [
        (GeometryKind::OuterLine, &config.outer_line),
        (GeometryKind::InnerLine, &config.inner_line),
    ];
    let mut handles = Vec::new();
    for line in track.polylines() {
        for (kind, style) in passes {
            let handle = registry.allocate(kind);
            backend.upload_line(handle, line, style);
            handles.push(handle);
        }
    }
    handles
}

fn release_all<B: RenderBackend + ?Sized>(
    registry: &mut GeometryRegistry<GeometryKind>,
    backend: &mut B,
    handles: &[Handle],
) -> Result<(), ResourceError> {
    for &handle in handles {
        let kind = registry.release(handle)?;
        backend.release(handle);
        debug!(%handle, ?kind, "geometry released");
    }
    Ok(())
}
