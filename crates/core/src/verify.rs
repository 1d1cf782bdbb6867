//! Deployment classpath verification.
//!
//! Every extension that the deployment artifact pulls in must also be a
//! dependency of the runtime artifact, i.e. a key of the runtime catalog.
//! Build-time processors rely on the runtime side of each extension being
//! present.

use crate::catalog::{Catalog, require_full};
use crate::error::{ConsistencyViolation, ExtguardError, MissingExtension, Result};
use crate::marker;
use extguard_api::{ClasspathKind, ClasspathResolver, Coordinate, ResolvedDependency};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Archives inspected on the deployment classpath
    pub checked: usize,
    /// Extensions found there, all of them catalogued
    pub extensions: BTreeSet<Coordinate>,
}

pub struct DeploymentVerifier<'a> {
    resolver: &'a dyn ClasspathResolver,
    catalog_file: PathBuf,
    marker_file: Option<PathBuf>,
}

impl<'a> DeploymentVerifier<'a> {
    pub fn new(resolver: &'a dyn ClasspathResolver, catalog_file: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            catalog_file: catalog_file.into(),
            marker_file: None,
        }
    }

    /// Touch this file after a successful verification.
    pub fn with_marker_file(mut self, marker_file: impl Into<PathBuf>) -> Self {
        self.marker_file = Some(marker_file.into());
        self
    }

    pub fn verify(&self) -> Result<VerificationReport> {
        let catalog = Catalog::load(&self.catalog_file)?;
        let dependencies = self.resolver.resolve(ClasspathKind::Deployment)?;
        info!(
            "Checking `{}` deployment dependencies against {} catalogued extensions",
            dependencies.len(),
            catalog.len()
        );

        let report = verify_deployment_classpath(&catalog, &dependencies)?;

        if let Some(marker_file) = &self.marker_file {
            touch(marker_file);
        }
        Ok(report)
    }
}

/// Check a resolved deployment classpath against the runtime catalog,
/// reporting every uncatalogued extension at once.
pub fn verify_deployment_classpath(
    catalog: &Catalog,
    dependencies: &[ResolvedDependency],
) -> Result<VerificationReport> {
    let mut report = VerificationReport::default();

    for dependency in dependencies.iter().filter(|d| d.is_archive()) {
        report.checked += 1;
        if marker::has_marker(dependency.file(), marker::Marker::Extension)? {
            debug!("Deployment classpath carries extension {}", dependency.coordinate);
            report
                .extensions
                .insert(require_full(dependency.coordinate.clone())?);
        }
    }

    let missing: Vec<MissingExtension> = report
        .extensions
        .iter()
        .filter(|coordinate| !catalog.contains(coordinate))
        .map(|coordinate| MissingExtension {
            coordinate: coordinate.clone(),
            runtime_version: catalog.versions_of(coordinate).next().map(str::to_string),
        })
        .collect();

    if !missing.is_empty() {
        return Err(ExtguardError::from(
            ConsistencyViolation::ExtensionsMissingFromRuntime(missing),
        ));
    }

    info!(
        "Deployment classpath consistent: {} archives, {} extensions",
        report.checked,
        report.extensions.len()
    );
    Ok(report)
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Unable to create output file directories {}: {}", parent.display(), e);
            return;
        }
    }
    if let Err(e) = std::fs::write(path, b"") {
        warn!("Unable to create output file {}: {}", path.display(), e);
    }
}
