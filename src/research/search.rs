// src/research/search.rs
use crate::config::{ProviderConfig, ResearchConfig};
use crate::error::ProviderError;
use crate::extractor::{self, ContactExtractor};
use crate::models::{ResearchRequest, SearchHit, SourceResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const SOURCE_ID: &str = "web_search";

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    /// How many of the built queries this provider is given per pass
    /// (paid APIs get fewer).
    fn query_budget(&self) -> usize;
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, ProviderError>;
}

pub struct TavilyProvider {
    client: Client,
    api_key: String,
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    fn name(&self) -> &'static str {
        "tavily"
    }

    fn query_budget(&self) -> usize {
        3
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let response = self
            .client
            .post("https://api.tavily.com/search")
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "search_depth": "advanced",
                "include_domains": [],
                "exclude_domains": ["facebook.com", "twitter.com", "instagram.com"],
                "max_results": max_results,
                "include_answer": true,
                "include_raw_content": true,
            }))
            .send()
            .await
            .map_err(crate::error::FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus {
                provider: "tavily",
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed {
                    provider: "tavily",
                    detail: e.to_string(),
                })?;

        let hits = body
            .get("results")
            .and_then(|v| v.as_array())
            .map(|results| {
                results
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(hits)
    }
}

pub struct BingProvider {
    client: Client,
    api_key: String,
}

#[async_trait]
impl SearchProvider for BingProvider {
    fn name(&self) -> &'static str {
        "bing"
    }

    fn query_budget(&self) -> usize {
        2
    }

    async fn search(
        &self,
        query: &str,
        _max_results: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let response = self
            .client
            .get("https://api.bing.microsoft.com/v7.0/search")
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("count", "10"),
                ("offset", "0"),
                ("mkt", "en-US"),
                ("safesearch", "Moderate"),
            ])
            .send()
            .await
            .map_err(crate::error::FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus {
                provider: "bing",
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed {
                    provider: "bing",
                    detail: e.to_string(),
                })?;

        let hits = body
            .pointer("/webPages/value")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| SearchHit {
                        title: string_field(item, "name"),
                        url: string_field(item, "url"),
                        content: string_field(item, "snippet"),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(hits)
    }
}

/// Keyless fallback using the DuckDuckGo instant-answer API. Shallow
/// results, but keeps the pass functional with no configured providers.
pub struct DuckDuckGoProvider {
    client: Client,
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn query_budget(&self) -> usize {
        2
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let response = self
            .client
            .get("https://api.duckduckgo.com/")
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(crate::error::FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::BadStatus {
                provider: "duckduckgo",
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed {
                    provider: "duckduckgo",
                    detail: e.to_string(),
                })?;

        let hits = body
            .get("RelatedTopics")
            .and_then(|v| v.as_array())
            .map(|topics| {
                topics
                    .iter()
                    .filter(|topic| topic.get("FirstURL").is_some())
                    .map(|topic| {
                        let text = string_field(topic, "Text");
                        SearchHit {
                            title: text.chars().take(100).collect(),
                            url: string_field(topic, "FirstURL"),
                            content: text,
                        }
                    })
                    .take(max_results)
                    .collect()
            })
            .unwrap_or_default();
        Ok(hits)
    }
}

fn string_field(value: &serde_json::Value, field: &str) -> String {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Queries covering the angles the pass cares about: direct contact info,
/// people, the site itself, and press/directory mentions.
pub fn build_queries(request: &ResearchRequest) -> Vec<String> {
    let company = &request.company;
    let host = Url::parse(&request.website)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| request.domain());

    let mut queries = vec![
        format!("\"{}\" contact email phone {}", company, request.country),
        format!("\"{}\" executives management team", company),
        format!("\"{}\" employee directory staff", company),
        format!("site:{} contact email", host),
        format!("\"{}\" press release contact spokesperson", company),
        format!("\"{}\" business directory listing", company),
    ];

    if matches!(
        request.country.to_lowercase().as_str(),
        "germany" | "deutschland"
    ) {
        queries.push(format!("\"{}\" impressum kontakt", company));
    }

    queries
}

/// Pick the provider for this run: paid APIs when a key is configured,
/// otherwise the keyless fallback.
pub fn select_provider(
    providers: &ProviderConfig,
    config: &ResearchConfig,
) -> Box<dyn SearchProvider> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.search_timeout_seconds))
        .build()
        .expect("Failed to create HTTP client");

    if let Some(api_key) = providers.tavily_api_key.clone() {
        Box::new(TavilyProvider { client, api_key })
    } else if let Some(api_key) = providers.bing_api_key.clone() {
        Box::new(BingProvider { client, api_key })
    } else {
        Box::new(DuckDuckGoProvider { client })
    }
}

/// Run the web-search pass. A failed query degrades to zero hits for that
/// query; the pass itself never fails.
pub async fn search_pass(
    provider: &dyn SearchProvider,
    config: &ResearchConfig,
    request: &ResearchRequest,
    extractor: &ContactExtractor,
) -> (SourceResult, Vec<SearchHit>) {
    let mut result = SourceResult::empty(SOURCE_ID);
    let mut all_hits: Vec<SearchHit> = Vec::new();

    let queries = build_queries(request);
    let budget = provider.query_budget().min(queries.len());
    info!(
        "Searching via {} ({} of {} queries)",
        provider.name(),
        budget,
        queries.len()
    );

    for (i, query) in queries.iter().take(budget).enumerate() {
        match provider.search(query, config.max_search_results).await {
            Ok(hits) => {
                debug!("{} hits for {:?}", hits.len(), query);
                all_hits.extend(hits);
            }
            Err(e) => warn!("Search query {:?} failed: {}", query, e),
        }
        if i + 1 < budget {
            tokio::time::sleep(Duration::from_millis(1000)).await;
        }
    }

    for hit in &all_hits {
        let text = format!("{} {}", hit.title, hit.content);
        let (emails, phones) = extractor::extract_validated(extractor, &text);
        result.emails.extend(emails);
        result.phones.extend(phones);
    }

    (result, all_hits)
}
