pub mod frame;
pub mod resources;

pub use frame::*;
pub use resources::*;
