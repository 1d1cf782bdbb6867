pub mod error;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use resolver::{ClasspathResolver, StaticResolver};
