use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unable to read resolution report `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid resolution report `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Artifact #{index} has no coordinate and `{}` is not in the Gradle cache", .file.display())]
    UnknownCoordinate { index: usize, file: PathBuf },
    #[error("Artifact `{0}` has no file and could not be found in the Gradle cache")]
    MissingFile(String),
    #[error("Artifact `{0}` is listed more than once")]
    Duplicate(String),
    #[error("`{from}` depends on `{to}`, which is not a resolved artifact")]
    UnknownReference { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;
