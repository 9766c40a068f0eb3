// src/extractor/validator.rs

/// Domains that never carry business contacts for the researched company:
/// placeholder/example hosts, social platforms, documentation and schema
/// hosts that show up constantly in page boilerplate.
const EXCLUDED_DOMAINS: &[&str] = &[
    "example.com",
    "test.com",
    "domain.com",
    "yoursite.com",
    "google.com",
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "github.com",
    "sentry.io",
    "gravatar.com",
    "w3.org",
    "schema.org",
    "mozilla.org",
];

/// Placeholder and bounce indicators, matched as substrings of the whole
/// lowercased address.
const PLACEHOLDER_INDICATORS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "test@",
    "admin@example",
    "user@example",
    "@example.com",
    "placeholder",
    "dummy",
    "fake",
];

/// Registrar boilerplate addresses in WHOIS records; not company contacts.
const REGISTRAR_INDICATORS: &[&str] = &["whoisguard", "proxy", "privacy", "registrar"];

/// Rejecting here is a normal filtering outcome, not an error; malformed
/// candidates are simply invalid.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.to_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || !domain.contains('.') {
        return false;
    }

    if EXCLUDED_DOMAINS.contains(&domain) {
        return false;
    }

    !PLACEHOLDER_INDICATORS
        .iter()
        .any(|indicator| email.contains(indicator))
}

/// Extra filter for WHOIS-sourced emails only.
pub fn is_registrar_email(email: &str) -> bool {
    let email = email.to_lowercase();
    REGISTRAR_INDICATORS
        .iter()
        .any(|indicator| email.contains(indicator))
}
