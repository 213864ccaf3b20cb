// src/extractors/mod.rs
pub mod policy;
pub mod product;

// Re-export key extraction types for convenience
pub use policy::{ExtractionPolicy, PolicyConfig};
pub use product::ProductDetailExtractor;
