#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid coordinate `{input}`: {reason}")]
    InvalidCoordinate { input: String, reason: &'static str },
    #[error("Unable to resolve {classpath} classpath: {message}")]
    Resolution {
        classpath: crate::ClasspathKind,
        message: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
