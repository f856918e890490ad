// Tripwire domain layer
// Detection core: checks, per-entity state, violation ledger and dispatch

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use error::*;
pub use ports::*;
pub use services::*;
pub use value_objects::*;
