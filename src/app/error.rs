use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkimmerError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Already running")]
    AlreadyRunning,

    #[error("Target post not found on page ({0}). Please ensure the post is visible.")]
    TargetNotFound(String),

    #[error("No posts rendered: {0}")]
    NoPosts(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SkimmerError>;
