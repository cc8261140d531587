//! Sphere/plane view switching.
//!
//! A toggle is a short choreography spread over frames:
//!
//! - to plane: re-centre and face the map head-on, wait `align_delay_s`,
//!   start morphing to the plane while dollying to fit the map, then lock the
//!   orbit angles once the camera has settled;
//! - to sphere: start morphing back, restore the sphere limits and fly home.
//!
//! [`ViewModeController::advance`] drives the phases and steps the morph.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use foundation::math::{Surface, Vec3};
use serde::Serialize;
use tracing::{info, warn};

use crate::camera::{CameraConstraints, CameraRig};
use crate::config::CameraConfig;
use crate::morph::MorphProgress;

/// Leftover delay below this counts as elapsed.
const DELAY_EPS: f64 = 1e-9;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    SphereView,
    TransitionToPlane,
    PlaneView,
    TransitionToSphere,
}

/// What the rest of the scene needs to know: the surface tracks and markers
/// live on, and whether a toggle is still playing out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ViewMode {
    pub surface: Surface,
    pub in_transition: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewModeError {
    TransitionInFlight { state: ViewState },
}

impl fmt::Display for ViewModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewModeError::TransitionInFlight { state } => {
                write!(f, "view toggle rejected: transition in flight ({state:?})")
            }
        }
    }
}

impl std::error::Error for ViewModeError {}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    /// Still in sphere view, waiting for the re-centring to play out.
    Aligning { remaining_s: f64 },
    /// Morphing to the plane, waiting for the dolly to finish.
    Dollying,
    /// Morphing to the sphere, waiting for the camera to get home.
    Returning,
}

#[derive(Debug, Clone)]
pub struct ViewModeController {
    state: ViewState,
    phase: Phase,
    morph: MorphProgress,
    morph_target: MorphProgress,
    morph_step: f64,
    camera: CameraConfig,
    /// Where the camera rests in sphere view.
    home: Vec3,
    /// Constraints in force when the sphere view was last left.
    sphere_constraints: Option<CameraConstraints>,
}

impl ViewModeController {
    pub fn new(camera: CameraConfig, morph_step: f64, home: Vec3) -> Self {
        Self {
            state: ViewState::SphereView,
            phase: Phase::Idle,
            morph: MorphProgress::SPHERE,
            morph_target: MorphProgress::SPHERE,
            morph_step,
            camera,
            home,
            sphere_constraints: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Surface the flight is shown on. Switches when the morph starts, not
    /// when it ends, so the track follows the mesh through the transition.
    pub fn mode(&self) -> Surface {
        match self.state {
            ViewState::SphereView | ViewState::TransitionToSphere => Surface::Sphere,
            ViewState::TransitionToPlane | ViewState::PlaneView => Surface::Plane,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        ViewMode {
            surface: self.mode(),
            in_transition: self.in_transition(),
        }
    }

    pub fn in_transition(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn morph_progress(&self) -> MorphProgress {
        self.morph
    }

    pub fn morph_target(&self) -> MorphProgress {
        self.morph_target
    }

    /// Starts the switch to the other view.
    ///
    /// Rejected while a previous toggle is still playing out; nothing changes
    /// in that case.
    pub fn toggle<C: CameraRig + ?Sized>(&mut self, camera: &mut C) -> Result<ViewState, ViewModeError> {
        if self.in_transition() {
            warn!("view toggle ignored while {:?} is in flight", self.state);
            return Err(ViewModeError::TransitionInFlight { state: self.state });
        }
        match self.state {
            ViewState::SphereView => {
                self.sphere_constraints = Some(camera.constraints());
                camera.set_target(Vec3::ZERO);
                camera.rotate_to(0.0, FRAC_PI_2);
                self.phase = Phase::Aligning {
                    remaining_s: self.camera.align_delay_s,
                };
                info!("aligning camera before morphing to plane");
            }
            ViewState::PlaneView => {
                self.state = ViewState::TransitionToSphere;
                self.morph_target = MorphProgress::SPHERE;
                let constraints = self
                    .sphere_constraints
                    .unwrap_or_else(|| CameraConstraints::sphere(&self.camera));
                camera.set_constraints(constraints);
                camera.set_target(Vec3::ZERO);
                camera.set_position(self.home);
                self.phase = Phase::Returning;
                info!("morphing to sphere");
            }
            ViewState::TransitionToPlane | ViewState::TransitionToSphere => {
                // Transitional states always carry a non-idle phase.
                return Err(ViewModeError::TransitionInFlight { state: self.state });
            }
        }
        Ok(self.state)
    }

    /// Plays the current toggle forward by `dt_s` and steps the morph once.
    pub fn advance<C: CameraRig + ?Sized>(&mut self, dt_s: f64, camera: &mut C) -> ViewState {
        match self.phase {
            Phase::Idle => {}
            Phase::Aligning { remaining_s } => {
                let remaining_s = remaining_s - dt_s.max(0.0);
                if remaining_s > DELAY_EPS {
                    self.phase = Phase::Aligning { remaining_s };
                } else {
                    self.begin_dolly(camera);
                }
            }
            Phase::Dollying => {
                if camera.is_settled() {
                    let c = camera.constraints();
                    camera.set_constraints(CameraConstraints::plane_locked(c.min_distance, c.max_distance));
                    self.state = ViewState::PlaneView;
                    self.phase = Phase::Idle;
                    info!("plane view locked");
                }
            }
            Phase::Returning => {
                if camera.is_settled() {
                    self.state = ViewState::SphereView;
                    self.phase = Phase::Idle;
                    info!("sphere view restored");
                }
            }
        }
        self.morph = self.morph.step_toward(self.morph_target, self.morph_step);
        self.state
    }

    fn begin_dolly<C: CameraRig + ?Sized>(&mut self, camera: &mut C) {
        self.state = ViewState::TransitionToPlane;
        self.morph_target = MorphProgress::PLANE;
        let [width, height] = self.camera.plane_rect;
        let fit = camera.distance_to_fit(width, height);
        let mut constraints = camera.constraints();
        constraints.min_distance = self.camera.plane_min_distance;
        constraints.max_distance = fit.max(self.camera.plane_min_distance);
        camera.set_constraints(constraints);
        camera.dolly_to(fit);
        self.phase = Phase::Dollying;
        info!(fit_distance = fit, "morphing to plane");
    }
}
