//! Gradle resolution reports.
//!
//! A report is the JSON dump of one resolved configuration:
//!
//! ```json
//! {
//!   "direct": ["io.acme:ext:1.0"],
//!   "artifacts": [
//!     { "coordinate": "io.acme:ext:1.0", "file": "libs/ext-1.0.jar",
//!       "dependencies": ["io.acme:core:1.0"] },
//!     { "file": "/home/u/.gradle/caches/modules-2/files-2.1/io.acme/core/1.0/ab12/core-1.0.jar" }
//!   ]
//! }
//! ```
//!
//! With `direct` present only artifacts reachable from it are returned;
//! without it the artifact list is taken as already closed.

use crate::discoverer::GradleCache;
use crate::error::{ReportError, Result};
use extguard_api::{Coordinate, ResolvedDependency};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionReport {
    #[serde(default)]
    pub direct: Vec<Coordinate>,
    #[serde(default)]
    pub artifacts: Vec<ReportArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Coordinate>,
}

/// Resolved artifacts as a dependency graph.
struct ArtifactGraph {
    graph: StableDiGraph<ResolvedDependency, ()>,
    exact: HashMap<Coordinate, NodeIndex>,
    /// `group:artifact` -> node, for references that omit or differ in
    /// version after conflict resolution
    modules: HashMap<Coordinate, NodeIndex>,
}

impl ArtifactGraph {
    fn lookup(&self, coordinate: &Coordinate) -> Option<NodeIndex> {
        self.exact
            .get(coordinate)
            .or_else(|| self.modules.get(&coordinate.unversioned()))
            .copied()
    }
}

impl ResolutionReport {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ReportError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve to `(coordinate, file)` pairs. Relative files are taken
    /// relative to `base`.
    pub fn resolve(&self, base: &Path, cache: &GradleCache) -> Result<Vec<ResolvedDependency>> {
        let graph = self.build_graph(base, cache)?;

        if self.direct.is_empty() {
            return Ok(graph
                .graph
                .node_indices()
                .map(|idx| graph.graph[idx].clone())
                .collect());
        }

        let mut dfs = Dfs::empty(&graph.graph);
        let mut closure = Vec::new();
        for direct in &self.direct {
            let start = graph
                .lookup(direct)
                .ok_or_else(|| ReportError::UnknownReference {
                    from: "direct".to_string(),
                    to: direct.to_string(),
                })?;
            dfs.move_to(start);
            while let Some(idx) = dfs.next(&graph.graph) {
                closure.push(graph.graph[idx].clone());
            }
        }

        debug!(
            "Closed {} direct dependencies over {} artifacts: {} resolved",
            self.direct.len(),
            self.artifacts.len(),
            closure.len()
        );
        Ok(closure)
    }

    fn build_graph(&self, base: &Path, cache: &GradleCache) -> Result<ArtifactGraph> {
        let mut graph = ArtifactGraph {
            graph: StableDiGraph::new(),
            exact: HashMap::new(),
            modules: HashMap::new(),
        };

        let mut nodes = Vec::with_capacity(self.artifacts.len());
        for (index, artifact) in self.artifacts.iter().enumerate() {
            let resolved = artifact.to_resolved(index, base, cache)?;
            let coordinate = resolved.coordinate.clone();
            if graph.exact.contains_key(&coordinate) {
                return Err(ReportError::Duplicate(coordinate.to_string()));
            }
            let idx = graph.graph.add_node(resolved);
            graph.exact.insert(coordinate.clone(), idx);
            graph.modules.insert(coordinate.unversioned(), idx);
            nodes.push((idx, artifact));
        }

        for (from, artifact) in nodes {
            for dependency in &artifact.dependencies {
                let to = graph
                    .lookup(dependency)
                    .ok_or_else(|| ReportError::UnknownReference {
                        from: graph.graph[from].coordinate.to_string(),
                        to: dependency.to_string(),
                    })?;
                graph.graph.add_edge(from, to, ());
            }
        }

        Ok(graph)
    }
}

impl ReportArtifact {
    fn coordinate(&self, cache: &GradleCache) -> Option<Coordinate> {
        self.coordinate
            .clone()
            .or_else(|| self.file.as_deref().and_then(|f| cache.coordinate_of(f)))
    }

    fn to_resolved(
        &self,
        index: usize,
        base: &Path,
        cache: &GradleCache,
    ) -> Result<ResolvedDependency> {
        let coordinate = self.coordinate(cache).ok_or_else(|| ReportError::UnknownCoordinate {
            index,
            file: self.file.clone().unwrap_or_default(),
        })?;

        let file = match &self.file {
            Some(file) if file.is_relative() => base.join(file),
            Some(file) => file.clone(),
            None => cache
                .locate(&coordinate)
                .ok_or_else(|| ReportError::MissingFile(coordinate.to_string()))?,
        };

        Ok(ResolvedDependency::new(coordinate, file))
    }
}
