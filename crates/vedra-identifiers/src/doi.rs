//! DOI shape validation, normalization and extraction

use lazy_static::lazy_static;
use regex::Regex;

/// Base URL of the DOI resolver
pub const DOI_RESOLVER_PREFIX: &str = "https://doi.org/";

lazy_static! {
    // A bare DOI: "10." + registrant code of 4-9 digits + "/" + non-blank suffix
    static ref DOI_SHAPE: Regex = Regex::new(r"^10\.[0-9]{4,9}/\S+$").unwrap();

    // DOI embedded in free text, optionally behind a "doi:" or resolver URL prefix
    static ref DOI_IN_TEXT: Regex = Regex::new(
        r#"(?i)(?:doi[:\s]*)?(?:https?://(?:dx\.)?doi\.org/)?(?P<doi>10\.[0-9]{4,9}/[^\s\]}>"',;]+)"#
    ).unwrap();

    static ref DOI_PREFIX: Regex = Regex::new(
        r"(?i)^(?:doi:\s*|https?://(?:dx\.)?doi\.org/)"
    ).unwrap();
}

/// Check that a value has the `10.xxxx/suffix` shape.
///
/// Surrounding whitespace is ignored; prefixes such as `doi:` or a resolver
/// URL are not. Use [`normalize_doi`] first when accepting pasted input.
pub fn is_valid_doi(value: &str) -> bool {
    DOI_SHAPE.is_match(value.trim())
}

/// Strip a `doi:` label or resolver URL and trailing punctuation from a DOI
pub fn normalize_doi(value: &str) -> String {
    let trimmed = value.trim();
    let stripped = DOI_PREFIX.replace(trimmed, "");
    clean_doi(&stripped)
}

/// Extract DOIs from free text (e.g. a pasted reference citation)
pub fn extract_dois(text: &str) -> Vec<String> {
    DOI_IN_TEXT
        .captures_iter(text)
        .filter_map(|cap| cap.name("doi"))
        .map(|m| clean_doi(m.as_str()))
        .collect()
}

/// Resolver URL for a DOI, or `None` when the value is not DOI-shaped
pub fn doi_url(value: &str) -> Option<String> {
    let doi = normalize_doi(value);
    if is_valid_doi(&doi) {
        Some(format!("{}{}", DOI_RESOLVER_PREFIX, doi))
    } else {
        None
    }
}

/// Remove trailing punctuation picked up from surrounding prose
fn clean_doi(doi: &str) -> String {
    let mut s = doi.to_string();
    while let Some(c) = s.chars().last() {
        if c == '.' || c == ',' || c == ';' || c == ')' || c == ']' {
            s.pop();
        } else {
            break;
        }
    }
    s
}
