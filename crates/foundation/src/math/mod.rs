pub mod geodesy;
pub mod quat;
pub mod vec;

pub use geodesy::*;
pub use quat::*;
pub use vec::*;
