use super::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File extensions treated as packaged archives.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["jar"];

/// Named classpath handed to a resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClasspathKind {
    /// Runtime classpath of the runtime artifact
    Runtime,
    /// Runtime classpath of the deployment artifact
    Deployment,
}

impl ClasspathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClasspathKind::Runtime => "runtime",
            ClasspathKind::Deployment => "deployment",
        }
    }
}

impl fmt::Display for ClasspathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coordinate together with the local file it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,
    pub file: PathBuf,
}

impl ResolvedDependency {
    pub fn new(coordinate: Coordinate, file: impl Into<PathBuf>) -> Self {
        Self {
            coordinate,
            file: file.into(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Extension of the resolved file, lower-cased.
    pub fn extension(&self) -> Option<String> {
        self.file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    pub fn is_archive(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
    }
}
