pub mod check_handlers;
pub mod ingest_handlers;
pub mod ops_handlers;
pub mod session_handlers;
pub mod violation_handlers;

pub use check_handlers::*;
pub use ingest_handlers::*;
pub use ops_handlers::*;
pub use session_handlers::*;
pub use violation_handlers::*;
