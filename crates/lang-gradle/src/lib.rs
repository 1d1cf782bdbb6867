pub mod discoverer;
pub mod error;
pub mod report;
pub mod resolver;

pub use discoverer::GradleCache;
pub use error::ReportError;
pub use report::{ReportArtifact, ResolutionReport};
pub use resolver::ReportResolver;
