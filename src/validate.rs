/// URL validation for clipboard tokens
use url::Url;

/// Longest URL we are willing to open, in UTF-16 units (host string length)
pub const MAX_URL_LEN: usize = 2048;

/// Check whether a string is a well-formed http/https URL
///
/// Empty strings and strings over `MAX_URL_LEN` are rejected before parsing.
pub fn is_valid_url(s: &str) -> bool {
    if s.is_empty() || s.encode_utf16().count() > MAX_URL_LEN {
        return false;
    }

    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Split clipboard text on whitespace runs and keep the valid URLs, in order
pub fn extract_urls(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| is_valid_url(token))
        .map(str::to_string)
        .collect()
}
