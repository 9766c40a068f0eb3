// src/research/whois.rs
use crate::error::ProviderError;
use crate::extractor::validator::{is_registrar_email, is_valid_email};
use crate::models::{SourceResult, WhoisInfo};
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use whois_rust::{WhoIs, WhoIsLookupOptions};

pub const SOURCE_ID: &str = "whois";

/// Minimal server map used when no whois-servers.json ships next to the
/// binary; the IANA fallback covers the rest.
const FALLBACK_SERVERS: &str = r#"{
    "com": "whois.verisign-grs.com",
    "net": "whois.verisign-grs.com",
    "org": "whois.pir.org",
    "": "whois.iana.org"
}"#;

/// One WHOIS lookup, timeout-bounded. Errors degrade the source to empty
/// at the orchestrator; nothing here aborts the run.
pub async fn lookup(domain: &str, timeout_seconds: u64) -> Result<WhoisInfo, ProviderError> {
    let whois = WhoIs::from_path("whois-servers.json")
        .or_else(|_| WhoIs::from_string(FALLBACK_SERVERS))
        .map_err(|e| ProviderError::Malformed {
            provider: "whois",
            detail: format!("client setup: {}", e),
        })?;

    let options =
        WhoIsLookupOptions::from_string(domain).map_err(|e| ProviderError::Malformed {
            provider: "whois",
            detail: format!("invalid domain: {}", e),
        })?;

    let record = match tokio::time::timeout(
        Duration::from_secs(timeout_seconds),
        tokio::task::spawn_blocking(move || whois.lookup(options)),
    )
    .await
    {
        Ok(Ok(Ok(record))) => record,
        Ok(Ok(Err(e))) => {
            return Err(ProviderError::Malformed {
                provider: "whois",
                detail: e.to_string(),
            })
        }
        Ok(Err(join_error)) => {
            return Err(ProviderError::Malformed {
                provider: "whois",
                detail: format!("lookup task failed: {}", join_error),
            })
        }
        Err(_) => return Err(ProviderError::Http(crate::error::FetchError::Timeout)),
    };

    debug!("WHOIS record for {} is {} bytes", domain, record.len());
    Ok(parse_record(&record))
}

/// Pull the fields worth reporting out of a raw WHOIS record.
pub fn parse_record(record: &str) -> WhoisInfo {
    let mut info = WhoisInfo {
        organization: first_field(
            record,
            &[
                r"(?i)Registrant Organization:\s*(.+)",
                r"(?i)Organization:\s*(.+)",
                r"(?i)OrgName:\s*(.+)",
                r"(?i)org-name:\s*(.+)",
            ],
        ),
        registrar: first_field(record, &[r"(?i)Registrar:\s*(.+)"]),
        creation_date: first_field(
            record,
            &[
                r"(?i)Creation Date:\s*(\S+)",
                r"(?i)Created(?: On| Date)?:\s*(\S+)",
            ],
        ),
        emails: Vec::new(),
    };

    // Registrar boilerplate addresses are noise, not company contacts.
    let email_regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    let mut seen = HashSet::new();
    for email_match in email_regex.find_iter(record) {
        let email = email_match.as_str().to_lowercase();
        if is_valid_email(&email) && !is_registrar_email(&email) && seen.insert(email.clone()) {
            info.emails.push(email);
        }
    }

    info
}

fn first_field(record: &str, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        if let Ok(regex) = Regex::new(pattern) {
            if let Some(captures) = regex.captures(record) {
                let value = captures[1].trim().to_string();
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// The whois SourceResult carries only its emails; the descriptive fields
/// ride along separately for the report.
pub async fn whois_pass(domain: &str, timeout_seconds: u64) -> (SourceResult, Option<WhoisInfo>) {
    let mut result = SourceResult::empty(SOURCE_ID);
    match lookup(domain, timeout_seconds).await {
        Ok(info) => {
            result.emails.extend(info.emails.iter().cloned());
            (result, Some(info))
        }
        Err(e) => {
            warn!("WHOIS lookup for {} failed: {}", domain, e);
            (result, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "\
Domain Name: acme.com
Registrant Organization: Acme Widgets GmbH
Registrar: Example Registrar LLC
Creation Date: 2003-07-22T09:00:00Z
Registrant Email: ceo@acme.com
Tech Email: privacy@whoisguard-proxy.net
Admin Email: CEO@ACME.COM
";

    #[test]
    fn parses_descriptive_fields() {
        let info = parse_record(RECORD);
        assert_eq!(info.organization.as_deref(), Some("Acme Widgets GmbH"));
        assert_eq!(info.registrar.as_deref(), Some("Example Registrar LLC"));
        assert_eq!(info.creation_date.as_deref(), Some("2003-07-22T09:00:00Z"));
    }

    #[test]
    fn collects_emails_dropping_registrar_noise_and_duplicates() {
        let info = parse_record(RECORD);
        assert_eq!(info.emails, vec!["ceo@acme.com"]);
    }

    #[test]
    fn empty_record_yields_empty_info() {
        let info = parse_record("");
        assert!(info.organization.is_none());
        assert!(info.emails.is_empty());
    }
}
