pub mod check_commands;
pub mod ingest_commands;
pub mod session_commands;
