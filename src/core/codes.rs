use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Canonical FIPE reference code: six digits, hyphen, check digit.
static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}-\d$").unwrap());

/// Normalize a raw token into a canonical `000000-0` code.
///
/// Already-canonical input is returned unchanged. Otherwise every non-digit
/// character is stripped; exactly seven remaining digits are reformatted as
/// `DDDDDD-D`. Any other digit count is rejected, no partial correction.
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if CODE_PATTERN.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 7 {
        return Some(format!("{}-{}", &digits[..6], &digits[6..]));
    }

    None
}

/// Tokenize free-form text on runs of whitespace, commas or semicolons and
/// normalize each token, keeping valid codes in input order. Invalid tokens
/// are dropped silently.
pub fn parse_codes_from_text(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter_map(normalize_code)
        .collect()
}

/// Concatenate independent text sources (form field, file contents) with a
/// newline separator. Concatenation order defines token order.
pub fn merge_text_sources(sources: &[&str]) -> String {
    sources.join("\n")
}

/// Collapse to first-occurrence order, unique by exact value.
pub fn unique_preserve_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.clone()) {
            result.push(item);
        }
    }
    result
}
