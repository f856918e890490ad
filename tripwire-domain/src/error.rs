use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("check not found: {0}")]
    CheckNotFound(String),
}
