// src/export.rs
use crate::error::Result;
use crate::models::ContactKind;
use crate::research::ResearchOutcome;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// One exported contact row. Every record carries its value, kind,
/// category (emails only) and the sources that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRecord {
    pub contact: String,
    pub kind: &'static str,
    pub category: String,
    pub found_by: Vec<String>,
    pub company: String,
    pub website: String,
    pub country: String,
    pub industry: String,
    pub research_date: String,
}

pub fn build_records(outcome: &ResearchOutcome) -> Vec<ContactRecord> {
    let research_date = Utc::now().format("%Y-%m-%d %H:%M").to_string();
    let request = &outcome.request;
    let mut records = Vec::new();

    for (category, emails) in &outcome.categories {
        for email in emails {
            records.push(ContactRecord {
                contact: email.clone(),
                kind: ContactKind::Email.as_str(),
                category: category.as_str().to_string(),
                found_by: outcome.aggregate.sources_for(email),
                company: request.company.clone(),
                website: request.website.clone(),
                country: request.country.clone(),
                industry: request.industry.clone(),
                research_date: research_date.clone(),
            });
        }
    }

    let mut phones: Vec<&String> = outcome.aggregate.phones.iter().collect();
    phones.sort();
    for phone in phones {
        records.push(ContactRecord {
            contact: phone.clone(),
            kind: ContactKind::Phone.as_str(),
            category: String::new(),
            found_by: outcome.aggregate.sources_for(phone),
            company: request.company.clone(),
            website: request.website.clone(),
            country: request.country.clone(),
            industry: request.industry.clone(),
            research_date: research_date.clone(),
        });
    }

    records
}

pub async fn export_to_csv(records: &[ContactRecord], filename: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(filename).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(filename)?;
    writeln!(
        file,
        "contact,kind,category,found_by,company,website,country,industry,research_date"
    )?;
    for record in records {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            record.contact,
            record.kind,
            record.category,
            record.found_by.join(";"),
            record.company,
            record.website,
            record.country,
            record.industry,
            record.research_date,
        )?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    research_metadata: Metadata<'a>,
    contacts: Contacts,
    provenance: &'a std::collections::HashMap<String, std::collections::BTreeSet<String>>,
    categories: BTreeMap<&'static str, &'a Vec<String>>,
    suggested_patterns: &'a [crate::patterns::PatternSet],
    method_results: Vec<MethodSummary<'a>>,
    whois: &'a Option<crate::models::WhoisInfo>,
    page_stats: &'a [crate::models::PageStat],
    search_hits: &'a [crate::models::SearchHit],
    ai_report: &'a Option<String>,
    research_sources: &'a [crate::report::Citation],
}

/// Per-source contribution counts, before cross-source deduplication.
#[derive(Debug, Serialize)]
struct MethodSummary<'a> {
    source_id: &'a str,
    emails: usize,
    phones: usize,
}

#[derive(Debug, Serialize)]
struct Metadata<'a> {
    company: &'a str,
    website: &'a str,
    country: &'a str,
    industry: &'a str,
    research_date: String,
    total_emails: usize,
    total_phones: usize,
}

#[derive(Debug, Serialize)]
struct Contacts {
    emails: Vec<String>,
    phones: Vec<String>,
}

pub async fn export_to_json(
    outcome: &ResearchOutcome,
    filename: &str,
    pretty: bool,
) -> Result<()> {
    if let Some(parent) = std::path::Path::new(filename).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut emails: Vec<String> = outcome.aggregate.emails.iter().cloned().collect();
    emails.sort();
    let mut phones: Vec<String> = outcome.aggregate.phones.iter().cloned().collect();
    phones.sort();

    let export = JsonExport {
        research_metadata: Metadata {
            company: &outcome.request.company,
            website: &outcome.request.website,
            country: &outcome.request.country,
            industry: &outcome.request.industry,
            research_date: Utc::now().to_rfc3339(),
            total_emails: emails.len(),
            total_phones: phones.len(),
        },
        contacts: Contacts { emails, phones },
        provenance: &outcome.aggregate.provenance,
        categories: outcome
            .categories
            .iter()
            .map(|(category, bucket)| (category.as_str(), bucket))
            .collect(),
        suggested_patterns: &outcome.patterns,
        method_results: outcome
            .per_source
            .iter()
            .map(|source| MethodSummary {
                source_id: &source.source_id,
                emails: source.emails.len(),
                phones: source.phones.len(),
            })
            .collect(),
        whois: &outcome.whois,
        page_stats: &outcome.page_stats,
        search_hits: &outcome.search_hits,
        ai_report: &outcome.ai_report,
        research_sources: &outcome.citations,
    };

    let payload = if pretty {
        serde_json::to_string_pretty(&export)?
    } else {
        serde_json::to_string(&export)?
    };
    tokio::fs::write(filename, payload).await?;

    Ok(())
}

/// Timestamped per-company filename base, e.g. `acme_inc_contacts_202608241530`.
pub fn filename_base(company: &str) -> String {
    let slug = company.to_lowercase().replace(',', "").replace(' ', "_");
    format!("{}_contacts_{}", slug, Utc::now().format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AggregateResult;
    use crate::categorizer;
    use crate::models::{ResearchRequest, SourceResult};
    use crate::research::ResearchOutcome;

    fn outcome() -> ResearchOutcome {
        let mut source = SourceResult::empty("website");
        source.emails.insert("ceo@acme.com".to_string());
        source.emails.insert("john.smith@acme.com".to_string());
        source.phones.insert("555-123-4567".to_string());
        let mut aggregate = AggregateResult::new();
        aggregate.merge(&source);
        let categories = categorizer::categorize(aggregate.emails.iter());

        ResearchOutcome {
            request: ResearchRequest {
                company: "Acme, Inc".to_string(),
                website: "https://acme.com".to_string(),
                country: "United States".to_string(),
                industry: String::new(),
            },
            aggregate,
            categories,
            patterns: crate::patterns::generate("acme.com", "United States", ""),
            whois: None,
            page_stats: Vec::new(),
            search_hits: Vec::new(),
            ai_report: None,
            citations: Vec::new(),
            per_source: vec![source],
        }
    }

    #[test]
    fn records_carry_kind_category_and_sources() {
        let records = build_records(&outcome());
        assert_eq!(records.len(), 3);

        let ceo = records.iter().find(|r| r.contact == "ceo@acme.com").unwrap();
        assert_eq!(ceo.kind, "Email");
        assert_eq!(ceo.category, "executive");
        assert_eq!(ceo.found_by, vec!["website"]);

        let personal = records
            .iter()
            .find(|r| r.contact == "john.smith@acme.com")
            .unwrap();
        assert_eq!(personal.category, "personal");

        let phone = records.iter().find(|r| r.kind == "Phone").unwrap();
        assert_eq!(phone.contact, "555-123-4567");
        assert_eq!(phone.category, "");
    }

    #[tokio::test]
    async fn json_export_includes_provenance_and_method_counts() {
        let path = std::env::temp_dir().join("contact_scout_export_test.json");
        let path = path.to_string_lossy().to_string();
        export_to_json(&outcome(), &path, false).await.unwrap();

        let payload = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["research_metadata"]["total_emails"], 2);
        assert_eq!(value["method_results"][0]["source_id"], "website");
        assert!(value["provenance"]["ceo@acme.com"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("website")));
        tokio::fs::remove_file(&path).await.ok();
    }

    #[test]
    fn filename_base_slugs_the_company() {
        let base = filename_base("Acme, Inc");
        assert!(base.starts_with("acme_inc_contacts_"));
    }
}
