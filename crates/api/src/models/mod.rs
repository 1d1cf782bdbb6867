pub mod coordinate;
pub mod dependency;

pub use coordinate::*;
pub use dependency::*;
