//! Globe view: the sphere/plane morph mesh, the camera and view-mode state
//! machine, and the scene that ties them to the active flight.

pub mod camera;
pub mod config;
pub mod morph;
pub mod orbit_camera;
pub mod render;
pub mod scene;
pub mod trips;
pub mod view_mode;

pub use camera::*;
pub use config::*;
pub use morph::*;
pub use orbit_camera::*;
pub use render::*;
pub use scene::*;
pub use trips::*;
pub use view_mode::*;
