use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a published component: `group:artifact` or `group:artifact:version`.
///
/// Components never contain `:`, so equality on the fields is equality on the
/// canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    group: String,
    artifact: String,
    version: Option<String>,
}

impl Coordinate {
    /// Full three-part coordinate.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> ApiResult<Self> {
        Self::build(group.into(), artifact.into(), Some(version.into()))
    }

    /// Two-part `group:artifact` coordinate.
    pub fn group_artifact(group: impl Into<String>, artifact: impl Into<String>) -> ApiResult<Self> {
        Self::build(group.into(), artifact.into(), None)
    }

    fn build(group: String, artifact: String, version: Option<String>) -> ApiResult<Self> {
        let invalid = |reason| ApiError::InvalidCoordinate {
            input: render(&group, &artifact, version.as_deref()),
            reason,
        };

        if group.is_empty() || artifact.is_empty() {
            return Err(invalid("group and artifact must not be empty"));
        }
        if version.as_deref().is_some_and(str::is_empty) {
            return Err(invalid("version must not be empty"));
        }
        let parts = [Some(&group), Some(&artifact), version.as_ref()];
        if parts.iter().flatten().any(|p| p.contains(':')) {
            return Err(invalid("components must not contain `:`"));
        }

        Ok(Self {
            group,
            artifact,
            version,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_full(&self) -> bool {
        self.version.is_some()
    }

    /// Drops the version, yielding the `group:artifact` form.
    pub fn unversioned(&self) -> Self {
        Self {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
            version: None,
        }
    }
}

fn render(group: &str, artifact: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!("{}:{}:{}", group, artifact, v),
        None => format!("{}:{}", group, artifact),
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.group, &self.artifact, self.version.as_deref()))
    }
}

impl FromStr for Coordinate {
    type Err = ApiError;

    fn from_str(s: &str) -> ApiResult<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact] => Self::group_artifact(*group, *artifact),
            [group, artifact, version] => Self::new(*group, *artifact, *version),
            _ => Err(ApiError::InvalidCoordinate {
                input: s.to_string(),
                reason: "expected `group:artifact` or `group:artifact:version`",
            }),
        }
    }
}

impl TryFrom<String> for Coordinate {
    type Error = ApiError;

    fn try_from(value: String) -> ApiResult<Self> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(value: Coordinate) -> Self {
        value.to_string()
    }
}
