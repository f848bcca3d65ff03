use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Content already saved")]
    AlreadySaved,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn content_not_found() -> Self {
        CoreError::NotFound { entity: "Content" }
    }
}

impl From<learnhub_model::ModelError> for CoreError {
    fn from(err: learnhub_model::ModelError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
