use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Datagram decoded as JSON but does not hold exactly one submission.
    Payload(String),
    /// Store file holds valid JSON that is not an object.
    NotAnObject,
    Task(tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Json(value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Error::Task(value)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Payload(reason) => write!(f, "malformed payload: {}", reason),
            Error::NotAnObject => f.write_str("store does not contain a JSON object"),
            Error::Task(e) => write!(f, "background task failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Task(e) => Some(e),
            Error::Payload(_) | Error::NotAnObject => None,
        }
    }
}
