//! Gradle module cache layout.
//!
//! Resolved files live under
//! `~/.gradle/caches/modules-2/files-2.1/{group}/{artifact}/{version}/{hash}/{file}`,
//! so a cached file's path names its coordinate.

use extguard_api::Coordinate;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const FILES_DIR: &str = "files-2.1";

#[derive(Debug, Clone)]
pub struct GradleCache {
    cache_path: Option<PathBuf>,
}

impl GradleCache {
    pub fn new() -> Self {
        let cache_path = dirs::home_dir().map(|h| h.join(".gradle/caches/modules-2/files-2.1"));

        Self { cache_path }
    }

    /// Create with a custom cache path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            cache_path: Some(path),
        }
    }

    /// Infer the coordinate of a cached file from its path. Paths outside
    /// the configured root are still recognised by their `files-2.1` segment.
    pub fn coordinate_of(&self, path: &Path) -> Option<Coordinate> {
        let relative: Vec<Component<'_>> = match self
            .cache_path
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
        {
            Some(relative) => relative.components().collect(),
            None => {
                let components: Vec<_> = path.components().collect();
                let start = components
                    .iter()
                    .rposition(|c| c.as_os_str() == FILES_DIR)?;
                components[start + 1..].to_vec()
            }
        };

        // Expected: group/artifact/version/hash/file
        if relative.len() < 5 {
            return None;
        }
        let part = |i: usize| relative[i].as_os_str().to_string_lossy().to_string();
        Coordinate::new(part(0), part(1), part(2)).ok()
    }

    /// Find the main jar of `coordinate` in the cache, skipping sources and
    /// javadoc jars.
    pub fn locate(&self, coordinate: &Coordinate) -> Option<PathBuf> {
        let root = self.cache_path.as_ref()?;
        let version = coordinate.version()?;
        let module_dir = root
            .join(coordinate.group())
            .join(coordinate.artifact())
            .join(version);
        if !module_dir.is_dir() {
            return None;
        }

        let expected = format!("{}-{}.jar", coordinate.artifact(), version);
        let mut found: Vec<PathBuf> = WalkDir::new(&module_dir)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_str() == Some(expected.as_str()))
            .map(|e| e.into_path())
            .collect();
        found.sort();
        found.into_iter().next()
    }
}

impl Default for GradleCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_coordinate_under_configured_root() {
        let temp = tempfile::tempdir().unwrap();
        let cache = GradleCache::with_path(temp.path().to_path_buf());
        let jar = temp
            .path()
            .join("io.netty/netty-common/4.1.100.Final/abc123/netty-common-4.1.100.Final.jar");

        assert_eq!(
            cache.coordinate_of(&jar).unwrap().to_string(),
            "io.netty:netty-common:4.1.100.Final"
        );
    }

    #[test]
    fn test_coordinate_from_foreign_cache() {
        let cache = GradleCache::with_path(PathBuf::from("/nonexistent"));
        let jar = Path::new(
            "/ci/.gradle/caches/modules-2/files-2.1/io.quarkus/quarkus-arc/3.2.0/0f1e/quarkus-arc-3.2.0.jar",
        );
        assert_eq!(
            cache.coordinate_of(jar).unwrap().to_string(),
            "io.quarkus:quarkus-arc:3.2.0"
        );
    }

    #[test]
    fn test_unrelated_path_has_no_coordinate() {
        let cache = GradleCache::with_path(PathBuf::from("/nonexistent"));
        assert!(cache.coordinate_of(Path::new("/tmp/libs/foo.jar")).is_none());
        assert!(
            cache
                .coordinate_of(Path::new("/x/files-2.1/io.acme/foo/foo.jar"))
                .is_none()
        );
    }

    #[test]
    fn test_locate_skips_sources() {
        let temp = tempfile::tempdir().unwrap();
        let jar_dir = temp.path().join("io.netty/netty-common/4.1.100.Final/abc123");
        fs::create_dir_all(&jar_dir).unwrap();
        let jar = jar_dir.join("netty-common-4.1.100.Final.jar");
        fs::File::create(&jar).unwrap();
        fs::File::create(jar_dir.join("netty-common-4.1.100.Final-sources.jar")).unwrap();

        let cache = GradleCache::with_path(temp.path().to_path_buf());
        let coordinate: Coordinate = "io.netty:netty-common:4.1.100.Final".parse().unwrap();
        assert_eq!(cache.locate(&coordinate), Some(jar));

        let absent: Coordinate = "io.netty:netty-buffer:4.1.100.Final".parse().unwrap();
        assert_eq!(cache.locate(&absent), None);
    }
}
