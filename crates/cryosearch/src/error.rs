use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryoError {
    #[error("Invalid query: {0}")]
    Validation(#[from] crate::query::ValidationError),
    #[error("Datastore error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("Index error: {0}")]
    IndexError(#[from] crate::index::IndexError),
    #[error("Data error: {0}")]
    Data(#[from] cryosearch_data::DataError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CryoError>;
