// Domain value objects
pub mod geometry;
pub mod identifiers;
pub mod severity;

pub use geometry::*;
pub use identifiers::*;
pub use severity::*;
