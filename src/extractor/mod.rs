// src/extractor/mod.rs
pub mod contacts;
pub mod normalizer;
pub mod validator;

pub use contacts::{strip_phone_digits, ContactExtractor, Extracted};
pub use normalizer::{normalize, NormalizedPage};
pub use validator::is_valid_email;

use std::collections::HashSet;

/// Extract candidates from free text and keep only the ones that survive
/// validation. The convenience path every source pass uses.
pub fn extract_validated(
    extractor: &ContactExtractor,
    text: &str,
) -> (HashSet<String>, HashSet<String>) {
    let extracted = extractor.extract(text);
    let emails = extracted
        .emails
        .into_iter()
        .filter(|email| is_valid_email(email))
        .collect();
    (emails, extracted.phones)
}
