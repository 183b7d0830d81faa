use std::collections::HashSet;

use url::Url;

use crate::error::{ValidationError, ValidationErrors};

const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Check a submitted URL against the set of already tracked feed URLs.
/// Reports every applicable failure, not just the first one.
pub fn validate(candidate: &str, existing_urls: &HashSet<String>) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if candidate.trim().is_empty() {
        errors.push(ValidationError::EmptyUrl);
    } else if !is_absolute_url(candidate) {
        errors.push(ValidationError::MalformedUrl);
    }

    // exact, case-sensitive match
    if existing_urls.contains(candidate) {
        errors.push(ValidationError::DuplicateUrl);
    }

    match ValidationErrors::from_vec(errors) {
        Some(errs) => Err(errs),
        None => Ok(()),
    }
}

fn is_absolute_url(s: &str) -> bool {
    // Url::parse silently strips surrounding whitespace; a padded string is not a URL here
    if s.trim() != s || s.chars().any(char::is_whitespace) { return false; }
    // it also accepts `http:example.com`; an authority must be spelled out
    if !s.split_once(':').is_some_and(|(_, rest)| rest.starts_with("//")) { return false; }
    let Ok(url) = Url::parse(s) else { return false };
    ALLOWED_SCHEMES.contains(&url.scheme()) && url.host_str().is_some_and(|h| !h.is_empty())
}
