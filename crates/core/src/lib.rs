pub mod error;
pub mod logging;
pub mod properties;

pub mod catalog;
pub mod generate;
pub mod marker;
pub mod metadata;
pub mod project;
pub mod verify;

pub use catalog::{Catalog, CatalogBuilder, CatalogOutcome};
pub use error::{ConsistencyViolation, ExtguardError, MissingExtension, Result};
pub use project::{BuildLayout, ExtensionProject, Publication};
pub use verify::{DeploymentVerifier, VerificationReport};
