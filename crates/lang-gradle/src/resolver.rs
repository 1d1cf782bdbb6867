use crate::discoverer::GradleCache;
use crate::report::ResolutionReport;
use extguard_api::{ApiError, ApiResult, ClasspathKind, ClasspathResolver, ResolvedDependency};
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolves each classpath from the resolution report Gradle wrote for it.
#[derive(Debug, Clone, Default)]
pub struct ReportResolver {
    runtime: Option<PathBuf>,
    deployment: Option<PathBuf>,
    cache: GradleCache,
}

impl ReportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(mut self, classpath: ClasspathKind, report: impl Into<PathBuf>) -> Self {
        let report = Some(report.into());
        match classpath {
            ClasspathKind::Runtime => self.runtime = report,
            ClasspathKind::Deployment => self.deployment = report,
        }
        self
    }

    pub fn with_cache(mut self, cache: GradleCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn report_path(&self, classpath: ClasspathKind) -> Option<&Path> {
        match classpath {
            ClasspathKind::Runtime => self.runtime.as_deref(),
            ClasspathKind::Deployment => self.deployment.as_deref(),
        }
    }
}

impl ClasspathResolver for ReportResolver {
    fn resolve(&self, classpath: ClasspathKind) -> ApiResult<Vec<ResolvedDependency>> {
        let path = self.report_path(classpath).ok_or_else(|| {
            ApiError::NotFound(format!("no resolution report for the {} classpath", classpath))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let resolved = ResolutionReport::load(path)
            .and_then(|report| report.resolve(base, &self.cache))
            .map_err(|e| ApiError::Resolution {
                classpath,
                message: e.to_string(),
            })?;

        info!(
            "Resolved {} classpath from {}: {} artifacts",
            classpath,
            path.display(),
            resolved.len()
        );
        Ok(resolved)
    }

    fn name(&self) -> &str {
        "Gradle Report Resolver"
    }
}
