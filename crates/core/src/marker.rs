//! Archive marker scanning.
//!
//! Capability detection is a constant-path lookup: an archive either carries
//! a marker entry or it does not. The extension marker additionally holds a
//! single `deployment-artifact` property naming the companion deployment
//! coordinate.

use crate::error::{ExtguardError, Result};
use crate::properties;
use extguard_api::Coordinate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Property key inside the extension marker.
pub const DEPLOYMENT_ARTIFACT_KEY: &str = "deployment-artifact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Present only in deployment (build-time) archives
    Deployment,
    /// Present in an extension's runtime archive
    Extension,
}

impl Marker {
    pub const fn path(&self) -> &'static str {
        match self {
            Marker::Deployment => "META-INF/quarkus-build-steps.list",
            Marker::Extension => "META-INF/quarkus-extension.properties",
        }
    }
}

/// What a single probe of an archive found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerReport {
    pub deployment: bool,
    /// `Some` when the extension marker is present, holding its companion
    /// deployment coordinate.
    pub extension: Option<Coordinate>,
}

/// Whether `archive` contains an entry at the marker's path.
pub fn has_marker(archive: &Path, marker: Marker) -> Result<bool> {
    let mut zip = open(archive)?;
    contains(&mut zip, archive, marker)
}

/// Companion deployment coordinate stored in the extension marker, or `None`
/// if the archive is not an extension.
pub fn companion_deployment(archive: &Path) -> Result<Option<Coordinate>> {
    let mut zip = open(archive)?;
    read_companion(&mut zip, archive)
}

/// Answers both marker questions with one open of the archive.
pub fn probe(archive: &Path) -> Result<MarkerReport> {
    let mut zip = open(archive)?;
    let deployment = contains(&mut zip, archive, Marker::Deployment)?;
    let extension = read_companion(&mut zip, archive)?;
    Ok(MarkerReport {
        deployment,
        extension,
    })
}

fn open(archive: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(archive).map_err(|e| ExtguardError::io(archive, e))?;
    ZipArchive::new(file).map_err(|e| ExtguardError::archive(archive, e))
}

fn contains(zip: &mut ZipArchive<File>, archive: &Path, marker: Marker) -> Result<bool> {
    match zip.by_name(marker.path()) {
        Ok(_) => Ok(true),
        Err(ZipError::FileNotFound) => Ok(false),
        Err(e) => Err(ExtguardError::archive(archive, e)),
    }
}

fn read_companion(zip: &mut ZipArchive<File>, archive: &Path) -> Result<Option<Coordinate>> {
    let bytes = {
        let mut entry = match zip.by_name(Marker::Extension.path()) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(ExtguardError::archive(archive, e)),
        };
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ExtguardError::io(archive, e))?;
        bytes
    };

    // Properties files are ISO-8859-1
    let text: String = bytes.iter().map(|&b| b as char).collect();
    let props = properties::parse(&text);

    let value = props
        .get(DEPLOYMENT_ARTIFACT_KEY)
        .ok_or_else(|| {
            ExtguardError::malformed_marker(
                archive,
                format!("missing `{}` property", DEPLOYMENT_ARTIFACT_KEY),
            )
        })?;

    let coordinate = value
        .parse::<Coordinate>()
        .map_err(|e| ExtguardError::malformed_marker(archive, e.to_string()))?;

    Ok(Some(coordinate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_jar(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_marker_paths() {
        assert_eq!(
            Marker::Deployment.path(),
            "META-INF/quarkus-build-steps.list"
        );
        assert_eq!(
            Marker::Extension.path(),
            "META-INF/quarkus-extension.properties"
        );
    }

    #[test]
    fn test_plain_archive_has_no_markers() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("plain.jar");
        write_jar(&jar, &[("com/example/Foo.class", "\u{00CA}")]);

        assert!(!has_marker(&jar, Marker::Deployment).unwrap());
        assert!(!has_marker(&jar, Marker::Extension).unwrap());
        assert_eq!(companion_deployment(&jar).unwrap(), None);
        assert_eq!(probe(&jar).unwrap(), MarkerReport::default());
    }

    #[test]
    fn test_extension_marker_companion() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("ext.jar");
        write_jar(
            &jar,
            &[(
                Marker::Extension.path(),
                "deployment-artifact=io.acme\\:foo-deployment\\:1.0",
            )],
        );

        let report = probe(&jar).unwrap();
        assert!(!report.deployment);
        assert_eq!(
            report.extension.unwrap().to_string(),
            "io.acme:foo-deployment:1.0"
        );
    }

    #[test]
    fn test_extension_marker_without_key_is_malformed() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("ext.jar");
        write_jar(&jar, &[(Marker::Extension.path(), "something-else=1")]);

        let err = companion_deployment(&jar).unwrap_err();
        assert!(matches!(err, ExtguardError::MalformedMarker { .. }));
    }

    #[test]
    fn test_non_archive_fails_fast() {
        let temp = tempfile::tempdir().unwrap();
        let not_a_jar = temp.path().join("broken.jar");
        std::fs::write(&not_a_jar, b"definitely not a zip").unwrap();

        let err = has_marker(&not_a_jar, Marker::Deployment).unwrap_err();
        match err {
            ExtguardError::Archive { path, .. } => assert!(path.is_absolute()),
            other => panic!("Expected archive error, got {other:?}"),
        }
    }
}
