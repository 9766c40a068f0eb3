// src/extractor/contacts.rs
use regex::Regex;
use std::collections::HashSet;

/// Candidate contacts pulled out of one block of normalized text. Emails
/// are lowercased; phones keep the formatting they were found with.
#[derive(Debug, Default)]
pub struct Extracted {
    pub emails: HashSet<String>,
    pub phones: HashSet<String>,
}

pub struct ContactExtractor {
    email_regex: Regex,
    phone_regex: Regex,
    obfuscated_regexes: Vec<Regex>,
}

impl ContactExtractor {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
                .unwrap(),
            // North-American grouping with optional +1, plus German and UK
            // groupings (3-4 digit area code, 6-8 trailing digits). High
            // recall on purpose; the digit floor below does the filtering.
            phone_regex: Regex::new(
                r"(?x)
                (?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}
                |(?:\+49[-.\s]?)?\(?[0-9]{3,4}\)?[-.\s]?[0-9]{6,8}
                |(?:\+44[-.\s]?)?\(?[0-9]{3,4}\)?[-.\s]?[0-9]{6,8}",
            )
            .unwrap(),
            // Anti-spam obfuscation: "name [at] domain [dot] com" and the
            // parenthesised and bare spellings of the same trick.
            obfuscated_regexes: vec![
                Regex::new(
                    r"(?i)([a-zA-Z0-9._%+-]+)\s*\[?\s*(?:at|@)\s*\]?\s*([a-zA-Z0-9.-]+)\s*\[?\s*(?:dot|\.)\s*\]?\s*([a-zA-Z]{2,})",
                )
                .unwrap(),
                Regex::new(
                    r"(?i)([a-zA-Z0-9._%+-]+)\s*\(at\)\s*([a-zA-Z0-9.-]+)\s*\(dot\)\s*([a-zA-Z]{2,})",
                )
                .unwrap(),
                Regex::new(
                    r"(?i)([a-zA-Z0-9._%+-]+)\s+at\s+([a-zA-Z0-9.-]+)\s+dot\s+([a-zA-Z]{2,})",
                )
                .unwrap(),
            ],
        }
    }

    /// Pull email and phone candidates out of plain text. No validation
    /// beyond the phone digit floor happens here; callers hand the emails
    /// to the validator.
    pub fn extract(&self, text: &str) -> Extracted {
        let mut extracted = Extracted::default();

        for email_match in self.email_regex.find_iter(text) {
            extracted.emails.insert(email_match.as_str().to_lowercase());
        }

        for regex in &self.obfuscated_regexes {
            for captures in regex.captures_iter(text) {
                let (local, domain, tld) = (&captures[1], &captures[2], &captures[3]);
                let email = format!("{}@{}.{}", local, domain, tld).replace(' ', "");
                extracted.emails.insert(email.to_lowercase());
            }
        }

        for phone_match in self.phone_regex.find_iter(text) {
            let phone = phone_match.as_str().trim();
            if plausible_phone(phone) {
                extracted.phones.insert(phone.to_string());
            }
        }

        extracted
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Digit sequence used as the phone identity key: every digit, plus a
/// leading "+" when present.
pub fn strip_phone_digits(phone: &str) -> String {
    phone
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect()
}

/// The only phone filter: at least 10 digits once formatting is stripped.
/// Phone formats are too heterogeneous to whitelist, so precision is
/// traded for recall here and downstream stays permissive.
pub fn plausible_phone(phone: &str) -> bool {
    phone.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}
