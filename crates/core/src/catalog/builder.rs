use super::{Catalog, classpath_fingerprint, require_full};
use crate::error::{ConsistencyViolation, ExtguardError, Result};
use crate::marker;
use extguard_api::{ClasspathKind, ClasspathResolver, ResolvedDependency};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of a catalog build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// The catalog was (re)written.
    Built(Catalog),
    /// The persisted catalog already matches the resolved classpath.
    UpToDate(Catalog),
}

impl CatalogOutcome {
    pub fn catalog(&self) -> &Catalog {
        match self {
            CatalogOutcome::Built(c) | CatalogOutcome::UpToDate(c) => c,
        }
    }

    pub fn into_catalog(self) -> Catalog {
        match self {
            CatalogOutcome::Built(c) | CatalogOutcome::UpToDate(c) => c,
        }
    }
}

/// Resolves the runtime artifact's classpath, checks it for deployment
/// artifacts and persists the extension catalog.
pub struct CatalogBuilder<'a> {
    resolver: &'a dyn ClasspathResolver,
    output: PathBuf,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(resolver: &'a dyn ClasspathResolver, output: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            output: output.into(),
        }
    }

    pub fn build(&self) -> Result<CatalogOutcome> {
        let dependencies = self.resolver.resolve(ClasspathKind::Runtime)?;
        info!(
            "Checking `{}` runtime dependencies (resolver: {})",
            dependencies.len(),
            self.resolver.name()
        );

        let fingerprint = classpath_fingerprint(&dependencies)?;
        if let Some(current) = self.current_catalog(fingerprint) {
            info!(
                "Catalog {} is up-to-date ({} extensions)",
                self.output.display(),
                current.len()
            );
            return Ok(CatalogOutcome::UpToDate(current));
        }

        // Never leave a stale catalog for the verifier if this scan fails
        self.remove_stale()?;

        let catalog = scan_runtime_classpath(&dependencies)?.with_fingerprint(fingerprint);
        catalog.store(&self.output)?;

        info!(
            "Wrote catalog with {} extensions to {}",
            catalog.len(),
            self.output.display()
        );
        Ok(CatalogOutcome::Built(catalog))
    }

    fn current_catalog(&self, fingerprint: u64) -> Option<Catalog> {
        if !self.output.exists() {
            return None;
        }
        match Catalog::load(&self.output) {
            Ok(existing) if existing.fingerprint() == Some(fingerprint) => Some(existing),
            Ok(_) => {
                debug!("Runtime classpath changed; rebuilding catalog");
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable catalog {}: {}", self.output.display(), e);
                None
            }
        }
    }

    fn remove_stale(&self) -> Result<()> {
        match std::fs::remove_file(&self.output) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ExtguardError::io(&self.output, e)),
        }
    }
}

/// Scan a resolved runtime classpath, failing on the first deployment
/// artifact and cataloguing every extension.
pub fn scan_runtime_classpath(dependencies: &[ResolvedDependency]) -> Result<Catalog> {
    let mut catalog = Catalog::new();

    for dependency in dependencies {
        if !dependency.is_archive() {
            debug!("Skipping non-archive dependency - {}", dependency.coordinate);
            continue;
        }

        debug!("Checking runtime dependency - {}", dependency.coordinate);
        let report = marker::probe(dependency.file())?;

        if report.deployment {
            return Err(ConsistencyViolation::DeploymentOnRuntimeClasspath(
                dependency.coordinate.clone(),
            )
            .into());
        }

        if let Some(deployment) = report.extension {
            let extension = require_full(dependency.coordinate.clone())?;
            let deployment = require_full(deployment)?;
            debug!("Found extension {} -> {}", extension, deployment);
            if let Some(previous) = catalog.insert(extension.clone(), deployment) {
                warn!(
                    "Extension {} listed twice; replacing companion {}",
                    extension, previous
                );
            }
        }
    }

    Ok(catalog)
}
