// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::shop::models::ProductDetails;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Path for a file about `url` with the given suffix, e.g. `<slug>.json`.
    pub fn path_for(&self, url: &str, suffix: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", url_slug(url), suffix))
    }

    /// Writes the extracted details plus source metadata as `<slug>.json`.
    pub fn save_details(&self, details: &ProductDetails, url: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.path_for(url, ".json");

        let record = serde_json::json!({
            "source_url": url,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
            "current_price": details.current_price,
            "original_price": details.original_price,
            "available_sizes": details.available_sizes,
            "out_of_stock_sizes": details.out_of_stock_sizes,
            "item_code": details.item_code,
        });

        let record_str = serde_json::to_string_pretty(&record)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, record_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved product details to {}", file_path.display());

        Ok(file_path)
    }
}

/// File-name stem from the last path segment of a product URL.
/// Query string and fragment are dropped; anything outside `[A-Za-z0-9_-]` becomes `_`.
pub fn url_slug(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let slug: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if slug.is_empty() { "product".to_string() } else { slug }
}
