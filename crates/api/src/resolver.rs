//! Collaborator contract for dependency-graph resolution.
//!
//! Resolution itself happens elsewhere; implementations only hand back the
//! already-closed set of `(coordinate, file)` pairs for a named classpath.

use crate::error::ApiResult;
use crate::models::{ClasspathKind, ResolvedDependency};

pub trait ClasspathResolver {
    /// Resolve the given classpath, transitively closed.
    fn resolve(&self, classpath: ClasspathKind) -> ApiResult<Vec<ResolvedDependency>>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Fixed in-memory resolution, mostly useful for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    pub runtime: Vec<ResolvedDependency>,
    pub deployment: Vec<ResolvedDependency>,
}

impl StaticResolver {
    pub fn new(runtime: Vec<ResolvedDependency>, deployment: Vec<ResolvedDependency>) -> Self {
        Self {
            runtime,
            deployment,
        }
    }
}

impl ClasspathResolver for StaticResolver {
    fn resolve(&self, classpath: ClasspathKind) -> ApiResult<Vec<ResolvedDependency>> {
        Ok(match classpath {
            ClasspathKind::Runtime => self.runtime.clone(),
            ClasspathKind::Deployment => self.deployment.clone(),
        })
    }

    fn name(&self) -> &str {
        "Static Resolver"
    }
}
