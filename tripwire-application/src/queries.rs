pub mod check_queries;
pub mod violation_queries;
