//! Generated resources carried by the runtime archive: the extension marker
//! properties and the `quarkus-extension.yaml` descriptor.

use crate::error::{ExtguardError, Result};
use crate::marker::DEPLOYMENT_ARTIFACT_KEY;
use crate::project::{ExtensionProject, Publication};
use crate::properties;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    pub name: String,
    /// `group:artifact:version` of the runtime artifact
    pub artifact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub metadata: DescriptorMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorMetadata {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl ExtensionDescriptor {
    pub fn for_project(project: &ExtensionProject) -> Result<Self> {
        let config = &project.descriptor;
        Ok(Self {
            name: config.name.clone().unwrap_or_else(|| project.name.clone()),
            artifact: project.coordinate(Publication::Runtime)?.to_string(),
            description: project.description.clone(),
            metadata: DescriptorMetadata {
                status: config.status.clone(),
                guide: config.guide.clone(),
                categories: config.categories.clone(),
                keywords: config.keywords.clone(),
            },
        })
    }
}

/// Body of the extension marker: the single `deployment-artifact` entry.
pub fn extension_properties(project: &ExtensionProject) -> Result<String> {
    let deployment = project.coordinate(Publication::Deployment)?.to_string();
    Ok(properties::render(
        &[],
        [(DEPLOYMENT_ARTIFACT_KEY, deployment.as_str())],
    ))
}

pub fn generate_extension_properties(project: &ExtensionProject, path: &Path) -> Result<()> {
    write(path, &extension_properties(project)?)?;
    info!("Generated extension properties {}", path.display());
    Ok(())
}

pub fn generate_descriptor(project: &ExtensionProject, path: &Path) -> Result<ExtensionDescriptor> {
    let descriptor = ExtensionDescriptor::for_project(project)?;
    let yaml = serde_yaml_ng::to_string(&descriptor).map_err(|e| ExtguardError::yaml(path, e))?;
    write(path, &yaml)?;
    info!("Generated extension descriptor {}", path.display());
    Ok(descriptor)
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ExtguardError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| ExtguardError::io(path, e))
}
