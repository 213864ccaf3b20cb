// src/extractors/policy.rs
//! Structural markers for one product-page layout.
//!
//! [`PolicyConfig`] is the plain, serializable form (what a JSON layout file holds);
//! [`ExtractionPolicy`] is the compiled form the extractor walks.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, ExtractError};

// --- Default markers (current storefront theme) ---
const CURRENT_PRICE_SELECTOR: &str = "div.product-price--original";
const COMPARE_PRICE_SELECTOR: &str = "div.product-price--compare";
const SIZE_SELECT_SELECTOR: &str = "select";
const SIZE_OPTION_SELECTOR: &str = "option";
const OUT_OF_STOCK_MARKER: &str = "(Out of stock)";
const SIZE_SEPARATOR: char = '/';
const DESCRIPTION_SELECTOR: &str = "div.product-page--description";
const DESCRIPTION_LIST_SELECTOR: &str = "ul";
const DESCRIPTION_ITEM_SELECTOR: &str = "li";
const CURRENT_ITEM_CODE_PATTERN: &str = r"\bI\d{6}_[A-Z0-9]+_[A-Z0-9]+\b";
const LEGACY_ITEM_CODE_PATTERN: &str = r"I0\d{2}_\d{2}_\d{2}";

static DEFAULT_POLICY: Lazy<ExtractionPolicy> = Lazy::new(|| {
    ExtractionPolicy::compile(&PolicyConfig::current())
        .expect("Failed to compile the built-in extraction policy")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub current_price_selector: String,
    pub compare_price_selector: Option<String>,
    pub size_select_selector: String,
    pub size_option_selector: String,
    pub out_of_stock_marker: String,
    pub size_separator: char,
    pub description_selector: String,
    pub description_list_selector: String,
    pub description_item_selector: String,
    pub item_code_pattern: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::current()
    }
}

impl PolicyConfig {
    /// Layout with a compare-at price and the long item-code format (`I123456_AB_01`).
    pub fn current() -> Self {
        Self {
            current_price_selector: CURRENT_PRICE_SELECTOR.to_string(),
            compare_price_selector: Some(COMPARE_PRICE_SELECTOR.to_string()),
            size_select_selector: SIZE_SELECT_SELECTOR.to_string(),
            size_option_selector: SIZE_OPTION_SELECTOR.to_string(),
            out_of_stock_marker: OUT_OF_STOCK_MARKER.to_string(),
            size_separator: SIZE_SEPARATOR,
            description_selector: DESCRIPTION_SELECTOR.to_string(),
            description_list_selector: DESCRIPTION_LIST_SELECTOR.to_string(),
            description_item_selector: DESCRIPTION_ITEM_SELECTOR.to_string(),
            item_code_pattern: CURRENT_ITEM_CODE_PATTERN.to_string(),
        }
    }

    /// First-generation layout: a single price and short codes (`I012_34_56`).
    pub fn legacy() -> Self {
        Self {
            compare_price_selector: None,
            item_code_pattern: LEGACY_ITEM_CODE_PATTERN.to_string(),
            ..Self::current()
        }
    }

    /// Loads a layout from a JSON file. Missing keys fall back to the `current` layout.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Invalid policy file {}: {}", path.display(), e))
        })
    }
}

/// Compiled selectors and item-code regex.
#[derive(Debug, Clone)]
pub struct ExtractionPolicy {
    pub(crate) current_price: Selector,
    pub(crate) compare_price: Option<Selector>,
    pub(crate) size_select: Selector,
    pub(crate) size_option: Selector,
    pub(crate) description: Selector,
    pub(crate) description_list: Selector,
    pub(crate) description_item: Selector,
    pub(crate) item_code: Regex,
    pub(crate) out_of_stock_marker: String,
    pub(crate) out_of_stock: Option<Regex>, // Marker plus surrounding whitespace; None for an empty marker
    pub(crate) size_separator: char,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        DEFAULT_POLICY.clone()
    }
}

impl ExtractionPolicy {
    pub fn compile(config: &PolicyConfig) -> Result<Self, ExtractError> {
        let item_code = Regex::new(&config.item_code_pattern).map_err(|e| {
            ExtractError::RegexError(format!("'{}': {}", config.item_code_pattern, e))
        })?;

        let out_of_stock = if config.out_of_stock_marker.is_empty() {
            None
        } else {
            let pattern = format!(r"\s*{}\s*", regex::escape(&config.out_of_stock_marker));
            Some(Regex::new(&pattern).map_err(|e| ExtractError::RegexError(format!("'{}': {}", pattern, e)))?)
        };

        let compare_price = config
            .compare_price_selector
            .as_deref()
            .map(parse_selector)
            .transpose()?;

        Ok(Self {
            current_price: parse_selector(&config.current_price_selector)?,
            compare_price,
            size_select: parse_selector(&config.size_select_selector)?,
            size_option: parse_selector(&config.size_option_selector)?,
            description: parse_selector(&config.description_selector)?,
            description_list: parse_selector(&config.description_list_selector)?,
            description_item: parse_selector(&config.description_item_selector)?,
            item_code,
            out_of_stock_marker: config.out_of_stock_marker.clone(),
            out_of_stock,
            size_separator: config.size_separator,
        })
    }

    pub fn item_code_pattern(&self) -> &str {
        self.item_code.as_str()
    }

    pub fn out_of_stock_marker(&self) -> &str {
        &self.out_of_stock_marker
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
