// src/aggregator.rs
use crate::extractor::strip_phone_digits;
use crate::models::SourceResult;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Deduplicated contacts across every source, with per-contact provenance.
/// Merging is commutative, associative and idempotent, so independently
/// computed SourceResults can be folded in any order or interleaving.
///
/// Invariant: every value in `emails` / `phones` has a non-empty entry in
/// `provenance`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AggregateResult {
    pub emails: HashSet<String>,
    pub phones: HashSet<String>,
    pub provenance: HashMap<String, BTreeSet<String>>,
    /// Secondary phone identity: stripped digit key -> stored raw value.
    /// Two differently formatted strings with the same digits are one
    /// contact; the first formatting seen is the one kept.
    phone_keys: HashMap<String, String>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, source: &SourceResult) {
        for email in &source.emails {
            let email = email.to_lowercase();
            self.emails.insert(email.clone());
            self.provenance
                .entry(email)
                .or_default()
                .insert(source.source_id.clone());
        }

        for phone in &source.phones {
            let key = strip_phone_digits(phone);
            let stored = self
                .phone_keys
                .entry(key)
                .or_insert_with(|| phone.clone())
                .clone();
            self.phones.insert(stored.clone());
            self.provenance
                .entry(stored)
                .or_default()
                .insert(source.source_id.clone());
        }
    }

    /// Source ids that produced the given contact value.
    pub fn sources_for(&self, value: &str) -> Vec<String> {
        self.provenance
            .get(value)
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn total_contacts(&self) -> usize {
        self.emails.len() + self.phones.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, emails: &[&str], phones: &[&str]) -> SourceResult {
        SourceResult {
            source_id: id.to_string(),
            emails: emails.iter().map(|s| s.to_string()).collect(),
            phones: phones.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn merge_is_commutative() {
        let a = source("whois", &["ceo@acme.com", "info@acme.de"], &["555-123-4567"]);
        let b = source("website", &["info@acme.de"], &["(555) 123.4567"]);

        let mut ab = AggregateResult::new();
        ab.merge(&a);
        ab.merge(&b);

        let mut ba = AggregateResult::new();
        ba.merge(&b);
        ba.merge(&a);

        assert_eq!(ab.emails, ba.emails);
        assert_eq!(
            ab.provenance.get("info@acme.de"),
            ba.provenance.get("info@acme.de")
        );
        // Phone dedup keys match even though the stored formatting differs
        // by merge order.
        assert_eq!(ab.phones.len(), 1);
        assert_eq!(ba.phones.len(), 1);
    }

    #[test]
    fn merge_is_idempotent() {
        let a = source("web_search", &["sales@acme.com"], &["555-123-4567"]);

        let mut once = AggregateResult::new();
        once.merge(&a);
        let mut twice = AggregateResult::new();
        twice.merge(&a);
        twice.merge(&a);

        assert_eq!(once.emails, twice.emails);
        assert_eq!(once.phones, twice.phones);
        assert_eq!(once.provenance, twice.provenance);
    }

    #[test]
    fn phones_deduplicate_on_digit_key_keeping_first_formatting() {
        let mut aggregate = AggregateResult::new();
        aggregate.merge(&source("website", &[], &["555-123-4567"]));
        aggregate.merge(&source("ai_research", &[], &["(555) 123.4567"]));

        assert_eq!(aggregate.phones.len(), 1);
        assert!(aggregate.phones.contains("555-123-4567"));
        let sources = aggregate.sources_for("555-123-4567");
        assert_eq!(sources, vec!["ai_research", "website"]);
    }

    #[test]
    fn every_contact_has_nonempty_provenance() {
        let mut aggregate = AggregateResult::new();
        aggregate.merge(&source("whois", &["a@acme.com"], &["555-123-4567"]));
        aggregate.merge(&source("website", &["b@acme.com"], &[]));

        for email in &aggregate.emails {
            assert!(!aggregate.sources_for(email).is_empty());
        }
        for phone in &aggregate.phones {
            assert!(!aggregate.sources_for(phone).is_empty());
        }
    }

    #[test]
    fn email_identity_is_case_insensitive() {
        let mut aggregate = AggregateResult::new();
        aggregate.merge(&source("whois", &["CEO@Acme.com"], &[]));
        aggregate.merge(&source("website", &["ceo@acme.com"], &[]));
        assert_eq!(aggregate.emails.len(), 1);
        assert_eq!(
            aggregate.sources_for("ceo@acme.com"),
            vec!["website", "whois"]
        );
    }
}
