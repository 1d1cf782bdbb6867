//! Runtime dependency catalog.
//!
//! Maps every extension found on the runtime classpath to its companion
//! deployment coordinate. The catalog is persisted as a properties file so
//! that catalog building and deployment verification stay independently
//! cacheable steps.

mod builder;
mod fingerprint;

pub use builder::{CatalogBuilder, CatalogOutcome, scan_runtime_classpath};
pub use fingerprint::classpath_fingerprint;

use crate::error::{ExtguardError, Result};
use crate::properties;
use extguard_api::{ApiError, Coordinate};
use std::collections::BTreeMap;
use std::path::Path;

const FINGERPRINT_PREFIX: &str = "fingerprint=";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<Coordinate, Coordinate>,
    fingerprint: Option<u64>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fingerprint(mut self, fingerprint: u64) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Content fingerprint of the runtime classpath this catalog was built from.
    pub fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    /// Record an extension; a duplicate key replaces the earlier entry.
    pub fn insert(&mut self, extension: Coordinate, deployment: Coordinate) -> Option<Coordinate> {
        self.entries.insert(extension, deployment)
    }

    pub fn contains(&self, extension: &Coordinate) -> bool {
        self.entries.contains_key(extension)
    }

    pub fn deployment_of(&self, extension: &Coordinate) -> Option<&Coordinate> {
        self.entries.get(extension)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &Coordinate)> {
        self.entries.iter()
    }

    /// Catalogued versions of the given `group:artifact`.
    pub fn versions_of<'a>(&'a self, coordinate: &'a Coordinate) -> impl Iterator<Item = &'a str> {
        self.entries.keys().filter_map(move |key| {
            (key.group() == coordinate.group() && key.artifact() == coordinate.artifact())
                .then(|| key.version())
                .flatten()
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_properties(&self) -> String {
        let comments: Vec<String> = self
            .fingerprint
            .map(|fp| format!("{}{:016x}", FINGERPRINT_PREFIX, fp))
            .into_iter()
            .collect();
        let rendered: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        properties::render(
            &comments,
            rendered.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    pub fn from_properties(text: &str, source: &Path) -> Result<Self> {
        let mut catalog = Catalog::new();

        catalog.fingerprint = text
            .lines()
            .filter_map(|line| line.trim().strip_prefix('#'))
            .filter_map(|comment| comment.trim().strip_prefix(FINGERPRINT_PREFIX))
            .find_map(|hex| u64::from_str_radix(hex.trim(), 16).ok());

        for (key, value) in properties::parse(text) {
            let extension = parse_full(&key).map_err(|e| catalog_error(source, e))?;
            let deployment = parse_full(&value).map_err(|e| catalog_error(source, e))?;
            catalog.entries.insert(extension, deployment);
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ExtguardError::io(path, e))?;
        Self::from_properties(&text, path)
    }

    /// Write through a sibling temporary file so a failed write never leaves
    /// a truncated catalog behind.
    pub fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExtguardError::io(parent, e))?;
        }
        let staging = path.with_extension("properties.tmp");
        std::fs::write(&staging, self.to_properties())
            .map_err(|e| ExtguardError::io(&staging, e))?;
        std::fs::rename(&staging, path).map_err(|e| ExtguardError::io(path, e))
    }
}

fn parse_full(raw: &str) -> std::result::Result<Coordinate, ApiError> {
    let coordinate: Coordinate = raw.parse()?;
    require_full(coordinate)
}

/// Catalog keys and values are always `group:artifact:version`.
pub(crate) fn require_full(coordinate: Coordinate) -> std::result::Result<Coordinate, ApiError> {
    if coordinate.is_full() {
        Ok(coordinate)
    } else {
        Err(ApiError::InvalidCoordinate {
            input: coordinate.to_string(),
            reason: "a version is required",
        })
    }
}

fn catalog_error(source: &Path, err: ApiError) -> ExtguardError {
    ExtguardError::malformed(source, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    #[test]
    fn test_properties_round_trip() {
        let mut catalog = Catalog::new().with_fingerprint(0xdead_beef);
        catalog.insert(coord("g:ext:1.0"), coord("g:ext-deployment:1.0"));
        catalog.insert(coord("a:first:2.0"), coord("a:first-deployment:2.0"));

        let text = catalog.to_properties();
        assert!(text.starts_with("#fingerprint=00000000deadbeef\n"));
        // keys are written sorted
        let first_entry = text.lines().nth(1).unwrap();
        assert!(first_entry.starts_with("a\\:first\\:2.0="));

        let back = Catalog::from_properties(&text, Path::new("catalog.properties")).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_rejects_two_part_keys() {
        let err = Catalog::from_properties("g\\:ext=g\\:ext-deployment\\:1.0\n", Path::new("c"))
            .unwrap_err();
        assert!(matches!(err, ExtguardError::MalformedDocument { .. }));
    }

    #[test]
    fn test_versions_of() {
        let mut catalog = Catalog::new();
        catalog.insert(coord("g:ext:1.0"), coord("g:ext-deployment:1.0"));
        catalog.insert(coord("g:other:3.0"), coord("g:other-deployment:3.0"));

        let probe = coord("g:ext:2.0");
        let versions: Vec<_> = catalog.versions_of(&probe).collect();
        assert_eq!(versions, vec!["1.0"]);
    }
}
