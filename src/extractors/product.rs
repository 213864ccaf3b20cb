// src/extractors/product.rs

// --- Imports ---
use scraper::{ElementRef, Html};

use crate::extractors::policy::ExtractionPolicy;
use crate::shop::models::ProductDetails;

/// Availability of a single size option after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeOption {
    Available(String),
    OutOfStock(String),
}

// --- Main Extractor Structure ---
/// Walks the structural paths of an [`ExtractionPolicy`] over a parsed product page.
/// Missing markup never fails the extraction; each field degrades on its own.
#[derive(Debug, Clone, Default)]
pub struct ProductDetailExtractor {
    policy: ExtractionPolicy,
}

impl ProductDetailExtractor {
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExtractionPolicy {
        &self.policy
    }

    /// Parses `html_content` and extracts from it.
    pub fn extract_from_html(&self, html_content: &str) -> ProductDetails {
        let document = Html::parse_document(html_content);
        self.extract(&document)
    }

    pub fn extract(&self, document: &Html) -> ProductDetails {
        let current_price = first_text(document, &self.policy.current_price);
        let original_price = self
            .policy
            .compare_price
            .as_ref()
            .and_then(|selector| first_text(document, selector));

        let mut available_sizes = Vec::new();
        let mut out_of_stock_sizes = Vec::new();
        for option in self.size_options(document) {
            match option {
                SizeOption::Available(size) => available_sizes.push(size),
                SizeOption::OutOfStock(size) => out_of_stock_sizes.push(size),
            }
        }

        let item_code = self.find_item_code(document);

        tracing::debug!(
            "Extracted price={:?} compare_at={:?} available={:?} out_of_stock={:?} item_code={:?}",
            current_price, original_price, available_sizes, out_of_stock_sizes, item_code
        );

        ProductDetails {
            current_price,
            original_price,
            available_sizes,
            out_of_stock_sizes,
            item_code,
        }
    }

    /// Options of the first size control, normalized in document order.
    /// No control yields no options.
    fn size_options(&self, document: &Html) -> Vec<SizeOption> {
        let Some(select) = document.select(&self.policy.size_select).next() else {
            tracing::debug!("No size selection control found");
            return Vec::new();
        };

        select
            .select(&self.policy.size_option)
            .map(|option| self.classify_option(&element_text(option)))
            .collect()
    }

    /// Keeps the label after the last separator, then strips the out-of-stock marker.
    pub fn classify_option(&self, raw: &str) -> SizeOption {
        let mut label = raw.trim();
        if let Some(idx) = label.rfind(self.policy.size_separator) {
            label = label[idx + self.policy.size_separator.len_utf8()..].trim();
        }

        match &self.policy.out_of_stock {
            Some(marker) if marker.is_match(label) => {
                let stripped = marker.replace_all(label, " ");
                tracing::trace!("Option '{}' flagged out of stock", raw.trim());
                SizeOption::OutOfStock(stripped.trim().to_string())
            }
            _ => SizeOption::Available(label.to_string()),
        }
    }

    /// Description block -> first list -> first entry matching the item-code pattern.
    fn find_item_code(&self, document: &Html) -> Option<String> {
        let description = document.select(&self.policy.description).next()?;
        let list = description.select(&self.policy.description_list).next()?;

        let code = list
            .select(&self.policy.description_item)
            .map(element_text)
            .map(|text| text.trim().to_string())
            .find(|text| self.policy.item_code.is_match(text));

        tracing::debug!("Item code lookup in description list: {:?}", code);
        code
    }
}

fn first_text(document: &Html, selector: &scraper::Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element_text(element).trim().to_string())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}
