pub mod escalation_log;

pub use escalation_log::*;
