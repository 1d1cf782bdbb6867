//! Extension project configuration.
//!
//! A project is described by a small JSON file (`extguard.json`); every
//! output location is derived from its build directory.

use crate::error::{ExtguardError, Result};
use extguard_api::{ApiResult, Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_PROJECT_FILE: &str = "extguard.json";
pub const BUILD_DIR_ENV: &str = "EXTGUARD_BUILD_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProject {
    pub group: String,
    /// Runtime artifact id; the deployment and spi artifact ids derive from it.
    pub name: String,
    pub version: String,
    /// Whether the project publishes an spi artifact.
    #[serde(default)]
    pub spi: bool,
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub descriptor: DescriptorConfig,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

/// User-facing extension metadata written to `quarkus-extension.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorConfig {
    /// Display name; defaults to the project name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub guide: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_status() -> String {
    "development".to_string()
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            name: None,
            status: default_status(),
            guide: None,
            categories: Vec::new(),
            keywords: Vec::new(),
        }
    }
}

impl ExtensionProject {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            spi: false,
            build_dir: default_build_dir(),
            description: None,
            descriptor: DescriptorConfig::default(),
        }
    }

    /// Load from a JSON project file. A relative build directory is taken
    /// relative to the file's directory, and `EXTGUARD_BUILD_DIR` overrides it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtguardError::io(path, e))?;
        let mut project: Self =
            serde_json::from_str(&content).map_err(|e| ExtguardError::json(path, e))?;

        if let Ok(env_dir) = std::env::var(BUILD_DIR_ENV) {
            project.build_dir = PathBuf::from(env_dir);
        } else if project.build_dir.is_relative() {
            if let Some(parent) = path.parent() {
                project.build_dir = parent.join(&project.build_dir);
            }
        }

        project.coordinate(Publication::Runtime)?;
        Ok(project)
    }

    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    pub fn with_spi(mut self, spi: bool) -> Self {
        self.spi = spi;
        self
    }

    pub fn layout(&self) -> BuildLayout {
        BuildLayout::new(&self.build_dir)
    }

    /// Coordinate of one of the project's own publications.
    pub fn coordinate(&self, publication: Publication) -> ApiResult<Coordinate> {
        Coordinate::new(
            self.group.clone(),
            publication.artifact_id(&self.name),
            self.version.clone(),
        )
    }
}

/// The three artifacts an extension project publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Publication {
    Runtime,
    Deployment,
    Spi,
}

impl Publication {
    pub const ALL: [Publication; 3] = [
        Publication::Runtime,
        Publication::Deployment,
        Publication::Spi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Publication::Runtime => "runtime",
            Publication::Deployment => "deployment",
            Publication::Spi => "spi",
        }
    }

    pub fn artifact_id(&self, project_name: &str) -> String {
        match self {
            Publication::Runtime => project_name.to_string(),
            Publication::Deployment => format!("{}-deployment", project_name),
            Publication::Spi => format!("{}-spi", project_name),
        }
    }

    /// Prefix the publishing tooling puts on this publication's variant names.
    /// The runtime publication's variants already carry canonical names.
    pub fn variant_prefix(&self) -> Option<&'static str> {
        match self {
            Publication::Runtime => None,
            Publication::Deployment => Some("deployment"),
            Publication::Spi => Some("spi"),
        }
    }

    /// Artifact id of the sibling this publication's documents must depend on.
    pub fn companion(&self, project: &ExtensionProject) -> Option<String> {
        match self {
            Publication::Runtime if project.spi => Some(Publication::Spi.artifact_id(&project.name)),
            Publication::Runtime => None,
            Publication::Deployment => Some(Publication::Runtime.artifact_id(&project.name)),
            Publication::Spi => None,
        }
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Publication {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Publication::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown publication `{}`", s))
    }
}

/// Output locations under the build directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    build_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.build_dir
            .join("quarkus/runtime-dependencies-catalog.properties")
    }

    pub fn verification_marker(&self) -> PathBuf {
        self.build_dir.join("tmp/verifyDeploymentDependencies.txt")
    }

    pub fn extension_properties(&self) -> PathBuf {
        self.build_dir.join("quarkus/quarkus-extension.properties")
    }

    pub fn descriptor_file(&self) -> PathBuf {
        self.build_dir.join("quarkus/quarkus-extension.yaml")
    }
}
