use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuickWrapError {
    #[error("Quick tag not found: {0}")]
    TagNotFound(u64),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command already registered: {0}")]
    DuplicateCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, QuickWrapError>;
