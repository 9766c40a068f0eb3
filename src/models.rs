// src/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    Email,
    Phone,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Email => "Email",
            ContactKind::Phone => "Phone",
        }
    }
}

/// What one collaborator invocation (WHOIS call, scrape pass, search pass,
/// AI pass) contributed. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct SourceResult {
    pub source_id: String,
    pub emails: HashSet<String>,
    pub phones: HashSet<String>,
}

impl SourceResult {
    pub fn empty(source_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            emails: HashSet::new(),
            phones: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WhoisInfo {
    pub organization: Option<String>,
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub emails: Vec<String>,
}

/// Per-URL outcome of the website scrape pass.
#[derive(Debug, Clone, Serialize)]
pub struct PageStat {
    pub url: String,
    pub emails_found: usize,
    pub phones_found: usize,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct ResearchRequest {
    pub company: String,
    pub website: String,
    pub country: String,
    pub industry: String,
}

impl ResearchRequest {
    /// Bare domain of the target website, e.g. "acme.de".
    pub fn domain(&self) -> String {
        self.website
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.")
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_strips_scheme_www_and_path() {
        let request = ResearchRequest {
            company: "Acme".to_string(),
            website: "https://www.acme.de/kontakt".to_string(),
            country: "Germany".to_string(),
            industry: String::new(),
        };
        assert_eq!(request.domain(), "acme.de");
    }
}
