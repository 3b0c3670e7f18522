use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid queue name pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to read config file: {0}")]
    Ini(#[from] ini::Error),
    #[error("invalid management endpoint: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to list queues: {0}")]
    Listing(String),
    #[error("{0}")]
    Deletion(String),
    #[error("AMQP error: {0}")]
    Amqp(#[from] amqprs::error::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
