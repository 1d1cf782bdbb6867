use extguard_api::{ApiError, Coordinate};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtguardError {
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to treat file as archive - {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("XML error in `{}`: {message}", .path.display())]
    Xml { path: PathBuf, message: String },
    #[error("JSON error in `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("YAML error in `{}`: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("Malformed document `{}`: {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },
    #[error("Malformed extension marker in `{}`: {reason}", .path.display())]
    MalformedMarker { path: PathBuf, reason: String },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Consistency violation: {0}")]
    Consistency(#[from] ConsistencyViolation),
}

impl ExtguardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: absolute(path.into()),
            source,
        }
    }

    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: absolute(path.into()),
            source,
        }
    }

    pub fn xml(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::Xml {
            path: absolute(path.into()),
            message: message.to_string(),
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: absolute(path.into()),
            source,
        }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml_ng::Error) -> Self {
        Self::Yaml {
            path: absolute(path.into()),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: absolute(path.into()),
            reason: reason.into(),
        }
    }

    pub fn malformed_marker(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedMarker {
            path: absolute(path.into()),
            reason: reason.into(),
        }
    }

    /// Whether this is a classpath-composition failure rather than an I/O one.
    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency(_))
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// A classpath-composition failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyViolation {
    #[error("The extension's runtime classpath depends on a deployment artifact : `{0}`")]
    DeploymentOnRuntimeClasspath(Coordinate),
    #[error(
        "The deployment classpath depends on extension artifacts that are not dependencies of the runtime artifact : [{}]",
        render_missing(.0)
    )]
    ExtensionsMissingFromRuntime(Vec<MissingExtension>),
}

/// An extension found on the deployment classpath but absent from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingExtension {
    pub coordinate: Coordinate,
    /// Version of the same `group:artifact` on the runtime classpath, if any.
    pub runtime_version: Option<String>,
}

fn render_missing(missing: &[MissingExtension]) -> String {
    missing
        .iter()
        .map(|m| match &m.runtime_version {
            Some(v) => format!("{} (runtime classpath has {})", m.coordinate, v),
            None => m.coordinate.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ExtguardError>;
