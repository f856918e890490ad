pub mod config;
pub mod services;
pub mod utils;

pub use config::*;
pub use services::*;
pub use utils::*;
