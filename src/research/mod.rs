// src/research/mod.rs
pub mod ai;
pub mod scrape;
pub mod search;
pub mod whois;

use crate::aggregator::AggregateResult;
use crate::categorizer::{self, Category};
use crate::config::Config;
use crate::extractor::ContactExtractor;
use crate::models::{PageStat, ResearchRequest, SearchHit, SourceResult, WhoisInfo};
use crate::patterns::{self, PatternSet};
use crate::report::Citation;
use std::collections::BTreeMap;
use tracing::info;

/// Everything one research run produced. The pattern sets are guesses and
/// live outside the aggregate on purpose.
pub struct ResearchOutcome {
    pub request: ResearchRequest,
    pub aggregate: AggregateResult,
    pub categories: BTreeMap<Category, Vec<String>>,
    pub patterns: Vec<PatternSet>,
    pub whois: Option<WhoisInfo>,
    pub page_stats: Vec<PageStat>,
    pub search_hits: Vec<SearchHit>,
    pub ai_report: Option<String>,
    pub citations: Vec<Citation>,
    pub per_source: Vec<SourceResult>,
}

pub struct ContactFinder {
    config: Config,
}

impl ContactFinder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run all four source passes and fold their results. The passes are
    /// independent and the merge is commutative, so they fan out
    /// concurrently and the fold order does not matter.
    pub async fn research(&self, request: ResearchRequest) -> ResearchOutcome {
        let domain = request.domain();
        info!(
            "Researching {:?} ({}) in {:?}",
            request.company, domain, request.country
        );

        let research = &self.config.research;
        let extractor = ContactExtractor::new();
        let scraper = scrape::WebsiteScraper::new(research.clone());
        let search_provider = search::select_provider(&self.config.providers, research);

        let ((whois_result, whois_info), (site_result, page_stats), (search_result, search_hits), ai_outcome) = tokio::join!(
            whois::whois_pass(&domain, research.whois_timeout_seconds),
            scraper.scrape(&request.website),
            search::search_pass(search_provider.as_ref(), research, &request, &extractor),
            ai::ai_pass(&self.config.providers, research, &request),
        );

        // Single-writer reduction over the independent SourceResults.
        let per_source = vec![whois_result, site_result, search_result, ai_outcome.result];
        let mut aggregate = AggregateResult::new();
        for source in &per_source {
            if source.is_empty() {
                info!("Source {:?} contributed no contacts", source.source_id);
            } else {
                info!(
                    "Source {:?} contributed {} emails, {} phones",
                    source.source_id,
                    source.emails.len(),
                    source.phones.len()
                );
            }
            aggregate.merge(source);
        }

        let categories = categorizer::categorize(aggregate.emails.iter());
        let patterns = patterns::generate(&domain, &request.country, &request.industry);

        info!(
            "Research complete: {} unique contacts across {} sources",
            aggregate.total_contacts(),
            per_source.iter().filter(|s| !s.is_empty()).count()
        );

        ResearchOutcome {
            request,
            aggregate,
            categories,
            patterns,
            whois: whois_info,
            page_stats,
            search_hits,
            ai_report: ai_outcome.report,
            citations: ai_outcome.citations,
            per_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Network-dependent passes are exercised through their own modules;
    // here we pin the fold semantics the orchestrator relies on.
    #[test]
    fn fold_order_of_source_results_is_irrelevant() {
        let mut a = SourceResult::empty("whois");
        a.emails.insert("ceo@acme.com".to_string());
        let mut b = SourceResult::empty("website");
        b.emails.insert("ceo@acme.com".to_string());
        b.phones.insert("555-123-4567".to_string());

        let mut forward = AggregateResult::new();
        forward.merge(&a);
        forward.merge(&b);
        let mut backward = AggregateResult::new();
        backward.merge(&b);
        backward.merge(&a);

        assert_eq!(forward.emails, backward.emails);
        assert_eq!(forward.phones, backward.phones);
        assert_eq!(forward.provenance, backward.provenance);
    }
}
