// Domain entities
pub mod actor;
pub mod check_info;
pub mod check_result;
pub mod config;
pub mod dispatch_outcome;
pub mod escalation;
pub mod event;
pub mod ingest;

pub use actor::*;
pub use check_info::*;
pub use check_result::*;
pub use config::*;
pub use dispatch_outcome::*;
pub use escalation::*;
pub use event::*;
pub use ingest::*;
