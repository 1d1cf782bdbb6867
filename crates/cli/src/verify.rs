use crate::{ClasspathArgs, ProjectArgs};
use tracing::info;

pub fn run(args: &ProjectArgs, classpath: &ClasspathArgs) -> Result<(), Box<dyn std::error::Error>> {
    let project = args.load()?;
    let resolver = classpath.resolver();

    let report = extguard_runtime::verify_deployment(&project, resolver.as_ref())?;
    info!(
        "Deployment classpath verified: {} archives, {} extensions",
        report.checked,
        report.extensions.len()
    );
    Ok(())
}

pub fn run_check(
    args: &ProjectArgs,
    classpath: &ClasspathArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let project = args.load()?;
    let resolver = classpath.resolver();

    let summary = extguard_runtime::run_check(&project, resolver.as_ref())?;
    info!(
        "Check passed: {} runtime extensions catalogued, {} deployment extensions verified",
        summary.catalog.catalog().len(),
        summary.verification.extensions.len()
    );
    Ok(())
}
