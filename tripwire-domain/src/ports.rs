// Port traits (interfaces)
// Define what the detection core needs from its collaborators

pub mod actor;
pub mod services;

pub use actor::*;
pub use services::*;
