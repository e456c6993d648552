use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed record on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Record hash {0:?} is not a non-empty alphanumeric token")]
    InvalidHash(String),
    #[error("Record hash {0:?} appears more than once")]
    DuplicateHash(String),
    #[error("Datastore dump not found at {0}")]
    DumpNotFound(std::path::PathBuf),
}
