//! Flight paths: great-circle sampling, arc length, planar dateline splitting,
//! render tracks and the marker that follows them.

pub mod arc_length;
pub mod follower;
pub mod great_circle;
pub mod path;
pub mod polyline;
pub mod track;

pub use arc_length::*;
pub use follower::*;
pub use path::*;
pub use polyline::*;
pub use track::*;
