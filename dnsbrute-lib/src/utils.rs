//! Utility functions for candidate name construction and validation.
//!
//! This module contains helper functions for building fully qualified
//! candidate names from word-list labels and the target domain.

use crate::error::DnsBruteError;

/// Validate the target domain format.
///
/// This is a basic syntactic check - whether the domain actually exists is
/// determined by the lookups themselves.
pub fn validate_domain(domain: &str) -> Result<(), DnsBruteError> {
    let domain = domain.trim().trim_matches('.');

    if domain.is_empty() {
        return Err(DnsBruteError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if !domain.contains('.') {
        return Err(DnsBruteError::invalid_domain(
            domain,
            "Domain must contain at least one dot (e.g. example.com)",
        ));
    }

    if domain
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && c != '-' && c != '.' && c != '_')
    {
        return Err(DnsBruteError::invalid_domain(
            domain,
            "Domain contains invalid characters",
        ));
    }

    Ok(())
}

/// Normalize a target domain: trim whitespace and stray leading/trailing dots.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_matches('.').to_ascii_lowercase()
}

/// Whether a word-list entry is usable as a subdomain label.
///
/// Blank entries and comment lines are skipped; entries with characters that
/// can never appear in a hostname label are dropped rather than sent to the
/// resolver.
pub fn is_valid_label(label: &str) -> bool {
    let label = label.trim();

    if label.is_empty() || label.starts_with('#') {
        return false;
    }

    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Build the fully qualified candidate name for a label under the target
/// domain (e.g. "www" + "example.com" -> "www.example.com").
pub fn make_fqdn(label: &str, domain: &str) -> String {
    format!(
        "{}.{}",
        label.trim().trim_matches('.'),
        domain.trim().trim_matches('.')
    )
}

/// Filter a raw word list down to usable labels.
///
/// Preserves input order; trims surrounding whitespace.
pub fn sanitize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter(|l| is_valid_label(l.as_ref()))
        .map(|l| l.as_ref().trim().to_string())
        .collect()
}
