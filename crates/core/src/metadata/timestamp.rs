use std::fs::File;
use std::path::Path;
use std::time::SystemTime;
use tracing::{info, warn};

/// Modification time of `path`, if the filesystem reports one.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Put back the pre-edit modification time so incremental builds do not see
/// a timestamp-only change. Failure is logged, never propagated.
pub fn restore_modified_time(path: &Path, original: Option<SystemTime>) {
    let Some(original) = original else {
        info!(
            "No recorded timestamp for {}; up-to-date checks may be affected",
            path.display()
        );
        return;
    };

    if modified_time(path) == Some(original) {
        return;
    }

    let result = File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(original));
    if let Err(e) = result {
        warn!(
            "Unable to reset last-modified timestamp for {}; up-to-date checks may be affected: {}",
            path.display(),
            e
        );
    }
}
