mod cache;

pub use cache::GradleCache;
