use crate::error::{ExtguardError, Result};
use extguard_api::ResolvedDependency;
use std::path::Path;
use xxhash_rust::xxh3::{Xxh3, xxh3_64};

/// Content-addressed key over a resolved classpath: coordinates plus the
/// bytes of every resolved file. Independent of resolution order.
pub fn classpath_fingerprint(dependencies: &[ResolvedDependency]) -> Result<u64> {
    let mut entries = dependencies
        .iter()
        .map(|dep| -> Result<(String, u64)> {
            Ok((dep.coordinate.to_string(), file_digest(&dep.file)?))
        })
        .collect::<Result<Vec<_>>>()?;
    entries.sort();

    let mut hasher = Xxh3::new();
    for (coordinate, digest) in &entries {
        hasher.update(coordinate.as_bytes());
        hasher.update(&[0]);
        hasher.update(&digest.to_le_bytes());
    }
    Ok(hasher.digest())
}

fn file_digest(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| ExtguardError::io(path, e))?;
    if !metadata.is_file() {
        // classes directories and the like: identity only
        return Ok(xxh3_64(path.to_string_lossy().as_bytes()));
    }
    let bytes = std::fs::read(path).map_err(|e| ExtguardError::io(path, e))?;
    Ok(xxh3_64(&bytes))
}
