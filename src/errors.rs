use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid security constraint: {0}.")]
    InvalidConstraint(String),

    #[error("An error occurred deserializing constraint definition: {0}.")]
    Deserializing(#[from] serde_json::Error),

    #[error("An error occurred validating constraint definition: {0}.")]
    Validation(String),
}
