use thiserror::Error;

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid comic number: {0:?}")]
    InvalidComicNumber(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
