use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service responded with status {status}{}", detail_suffix(.detail))]
    Service { status: u16, detail: Option<String> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Timed out after {0:?} waiting for the authorization callback")]
    ConsentTimeout(std::time::Duration),

    #[error("{0}")]
    Other(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {}", d),
        _ => String::new(),
    }
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors the user can fix by changing their input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
