//! Post-processing of the generated descriptor (POM) and module metadata
//! documents of each publication.
//!
//! Both edits are single-pass: applying one twice to the same document
//! appends the companion dependency twice.

mod module;
mod pom;
mod timestamp;
mod variant;

pub use module::{VariantEdit, adjust_module_file, adjust_variants};
pub use pom::{PomDependency, PomDocument, inject_pom_dependency};
pub use timestamp::{modified_time, restore_modified_time};
pub use variant::{CANONICAL_VARIANTS, canonical_variant_name};

use crate::error::Result;
use crate::project::{ExtensionProject, Publication};
use extguard_api::Coordinate;
use std::path::Path;
use tracing::info;

/// Coordinate of the sibling artifact `publication` must depend on, if any.
pub fn companion_coordinate(
    project: &ExtensionProject,
    publication: Publication,
) -> Result<Option<Coordinate>> {
    publication
        .companion(project)
        .map(|artifact| Coordinate::new(project.group.clone(), artifact, project.version.clone()))
        .transpose()
        .map_err(Into::into)
}

/// Inject the companion dependency into a publication's POM. Returns `false`
/// when the publication has no companion and the file was not touched.
pub fn adjust_pom(path: &Path, publication: Publication, project: &ExtensionProject) -> Result<bool> {
    let Some(companion) = companion_coordinate(project, publication)? else {
        info!("{} publication has no companion; {} unchanged", publication, path.display());
        return Ok(false);
    };

    inject_pom_dependency(path, &companion)?;
    info!("Added {} to {}", companion, path.display());
    Ok(true)
}

/// Rename the variants of a publication's module metadata and inject the
/// companion dependency. Returns `false` when the file was not rewritten.
pub fn adjust_module_metadata(
    path: &Path,
    publication: Publication,
    project: &ExtensionProject,
) -> Result<bool> {
    let companion = companion_coordinate(project, publication)?;
    let edit = VariantEdit {
        prefix: publication.variant_prefix(),
        dependency: companion.as_ref(),
    };

    if edit.prefix.is_none() && edit.dependency.is_none() {
        info!("Nothing to adjust for {} publication in {}", publication, path.display());
        return Ok(false);
    }

    let changed = adjust_module_file(path, &edit)?;
    if changed {
        info!("Adjusted variants of {}", path.display());
    }
    Ok(changed)
}
