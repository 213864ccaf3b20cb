// src/utils/html_debug.rs
use std::fs;
use std::path::Path;
use regex::Regex;
use crate::utils::error::AppError;

/// Saves a copy of a product page with the given byte ranges wrapped in highlight spans.
/// Overlapping ranges are dropped after the first one in document order.
/// Returns the number of highlights actually written.
pub fn save_debug_html(html: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<usize, AppError> {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-oos { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-item-code { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-price { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| (h.0, h.1));

    let mut last_pos = 0;
    let mut written = 0;
    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos || end > html.len() || start >= end {
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "oos" => "highlight-oos",
            "item_code" => "highlight-item-code",
            "price" => "highlight-price",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
        written += 1;
    }

    debug_html.push_str(&html[last_pos..]);
    debug_html.push_str("\n</body>\n</html>");

    fs::write(path, debug_html)?;

    tracing::info!("Saved debug HTML with {} highlights to {}", written, path.display());
    Ok(written)
}

/// Creates a debug version of a product page with every match of the given regex patterns highlighted.
pub fn create_debug_html(html: &str, path: &Path, patterns: &[(&str, &str)]) -> Result<usize, AppError> {
    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    save_debug_html(html, path, &highlights)
}
