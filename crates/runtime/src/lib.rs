use extguard_api::{ClasspathKind, ClasspathResolver};
use extguard_core::{
    CatalogBuilder, CatalogOutcome, DeploymentVerifier, ExtensionProject, VerificationReport,
};
use std::path::Path;

/// Bootstraps the default resolver: one Gradle resolution report per
/// classpath, with coordinates inferred from the local Gradle cache.
/// Resolving a classpath without a report fails.
pub fn build_resolver(
    runtime_report: Option<&Path>,
    deployment_report: Option<&Path>,
) -> Box<dyn ClasspathResolver> {
    let mut resolver = extguard_gradle::ReportResolver::new();
    if let Some(report) = runtime_report {
        resolver = resolver.with_report(ClasspathKind::Runtime, report);
    }
    if let Some(report) = deployment_report {
        resolver = resolver.with_report(ClasspathKind::Deployment, report);
    }
    Box::new(resolver)
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(extguard_core::logging::init_logging(component, to_stderr))
}

/// Outcome of the full catalog-then-verify pipeline.
#[derive(Debug, Clone)]
pub struct CheckSummary {
    pub catalog: CatalogOutcome,
    pub verification: VerificationReport,
}

pub fn build_catalog(
    project: &ExtensionProject,
    resolver: &dyn ClasspathResolver,
) -> extguard_core::Result<CatalogOutcome> {
    CatalogBuilder::new(resolver, project.layout().catalog_file()).build()
}

pub fn verify_deployment(
    project: &ExtensionProject,
    resolver: &dyn ClasspathResolver,
) -> extguard_core::Result<VerificationReport> {
    let layout = project.layout();
    DeploymentVerifier::new(resolver, layout.catalog_file())
        .with_marker_file(layout.verification_marker())
        .verify()
}

/// Build the runtime catalog, then verify the deployment classpath against
/// it. The verifier never runs on a catalog that failed to build.
pub fn run_check(
    project: &ExtensionProject,
    resolver: &dyn ClasspathResolver,
) -> extguard_core::Result<CheckSummary> {
    let catalog = build_catalog(project, resolver)?;
    let verification = verify_deployment(project, resolver)?;
    tracing::info!(
        "{}: {} runtime extensions, {} deployment archives checked",
        project.name,
        catalog.catalog().len(),
        verification.checked
    );
    Ok(CheckSummary {
        catalog,
        verification,
    })
}
