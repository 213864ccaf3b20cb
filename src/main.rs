// src/main.rs
mod utils;
mod shop;
mod extractors;
mod storage;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use extractors::{ExtractionPolicy, PolicyConfig, ProductDetailExtractor};
use shop::client;
use shop::models::ProductDetails;
use storage::StorageManager;
use utils::AppError;

// Sample American Rag product page
const SAMPLE_URL: &str = "https://americanrag.ae/collections/carhartt-wip/products/l-s-master-shirt-for-mens-3?variant=44405048606894";

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Layout {
    /// Current theme: compare-at price, long item codes (I123456_AB_01)
    Current,
    /// First-generation theme: single price, short item codes (I012_34_56)
    Legacy,
}

/// Scrape price, sizes and item code from a product page
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Product page URL
    #[arg(default_value = SAMPLE_URL)]
    url: String,

    /// Built-in page layout
    #[arg(short, long, value_enum, default_value_t = Layout::Current)]
    layout: Layout,

    /// JSON file with layout markers (overrides --layout)
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Item code regex (overrides the layout's pattern)
    #[arg(long)]
    item_code_pattern: Option<String>,

    /// Directory to write the extracted details as JSON
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the details as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Debug mode - save the raw and annotated page into the output directory
    #[arg(short, long)]
    debug: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = client::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn policy_config(&self) -> Result<PolicyConfig, AppError> {
        let mut config = match &self.policy {
            Some(path) => PolicyConfig::from_json_file(path)?,
            None => match self.layout {
                Layout::Current => PolicyConfig::current(),
                Layout::Legacy => PolicyConfig::legacy(),
            },
        };
        if let Some(pattern) = &self.item_code_pattern {
            config.item_code_pattern = pattern.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    let config = args.policy_config()?;
    let extractor = ProductDetailExtractor::new(ExtractionPolicy::compile(&config)?);

    let storage = match &args.output_dir {
        Some(dir) => Some(StorageManager::new(dir)?),
        None => None,
    };
    if args.debug && storage.is_none() {
        return Err(AppError::Config("--debug needs --output-dir to save pages into".to_string()));
    }

    let http = client::build_client(Duration::from_secs(args.timeout_secs))
        .map_err(|e| AppError::Config(format!("Could not build HTTP client: {}", e)))?;

    let details = match &storage {
        Some(storage) => scrape_and_export(&http, &args.url, &extractor, storage, args.debug).await?,
        None => client::scrape_product_details(&http, &args.url, &extractor).await,
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&details)
            .map_err(|e| AppError::Config(format!("Could not render details as JSON: {}", e)))?;
        println!("{}", rendered);
    } else {
        print_details(details);
    }

    Ok(())
}

fn print_details(details: ProductDetails) {
    if !details.has_listing() {
        println!("Product details not found.");
        return;
    }

    let na = "n/a";
    let (price, original_price, available_sizes, out_of_stock_sizes, item_code) = details.into_tuple();
    println!("Product price: {}", price.as_deref().unwrap_or(na));
    println!("Original price: {}", original_price.as_deref().unwrap_or(na));
    println!("Available sizes: {:?}", available_sizes);
    println!("Out of stock sizes: {:?}", out_of_stock_sizes);
    println!("Item code: {}", item_code.as_deref().unwrap_or(na));
}

/// Fetches, extracts and writes the JSON export (plus debug pages when asked).
/// A failed fetch yields the empty record and leaves any earlier export in place.
async fn scrape_and_export(
    http: &reqwest::Client,
    url: &str,
    extractor: &ProductDetailExtractor,
    storage: &StorageManager,
    debug: bool,
) -> Result<ProductDetails, AppError> {
    let (html, details) = match client::try_scrape_product_details(http, url, extractor).await {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::error!("Error making request: {}", e);
            tracing::warn!("Skipping export for {}; existing files are left untouched", url);
            return Ok(ProductDetails::empty());
        }
    };

    if debug {
        save_debug_pages(storage, url, &html, extractor)?;
    }

    match storage.save_details(&details, url) {
        Ok(path) => tracing::info!("Saved details to: {}", path.display()),
        Err(e) => tracing::error!("Failed to save details: {}", e),
    }

    Ok(details)
}

/// Writes the raw page and a copy with out-of-stock markers and item codes highlighted.
fn save_debug_pages(
    storage: &StorageManager,
    url: &str,
    html: &str,
    extractor: &ProductDetailExtractor,
) -> Result<(), AppError> {
    let raw_path = storage.path_for(url, "_raw.html");
    std::fs::write(&raw_path, html)?;
    tracing::info!("Saved raw page to: {}", raw_path.display());

    let policy = extractor.policy();
    let marker_pattern = regex::escape(policy.out_of_stock_marker());
    let mut patterns = vec![(policy.item_code_pattern(), "item_code")];
    if !policy.out_of_stock_marker().is_empty() {
        patterns.push((marker_pattern.as_str(), "oos"));
    }

    let annotated_path = storage.path_for(url, "_annotated.html");
    if let Err(e) = utils::html_debug::create_debug_html(html, &annotated_path, &patterns) {
        tracing::warn!("Failed to create debug HTML: {}", e);
    }
    Ok(())
}
