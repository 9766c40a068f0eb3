// src/research/ai.rs
use crate::config::{ProviderConfig, ResearchConfig};
use crate::error::{FetchError, ProviderError};
use crate::models::{ResearchRequest, SourceResult};
use crate::report::{self, Citation};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

pub const SOURCE_ID: &str = "ai_research";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenRouter,
    OpenAi,
    Anthropic,
}

impl AiProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::OpenRouter => "openrouter",
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
        }
    }

    /// First provider with a configured key, if any.
    pub fn select(providers: &ProviderConfig) -> Option<(AiProvider, String)> {
        if let Some(key) = providers.openrouter_api_key.clone() {
            Some((AiProvider::OpenRouter, key))
        } else if let Some(key) = providers.openai_api_key.clone() {
            Some((AiProvider::OpenAi, key))
        } else {
            providers
                .anthropic_api_key
                .clone()
                .map(|key| (AiProvider::Anthropic, key))
        }
    }
}

/// Research prompt asking for a parseable markdown contact table.
pub fn build_prompt(request: &ResearchRequest) -> String {
    let domain = request.domain();
    let industry_line = if request.industry.is_empty() {
        String::new()
    } else {
        format!("**INDUSTRY**: {}\n", request.industry)
    };

    format!(
        "You are a professional business research assistant specializing in finding \
verified contact information.

**RESEARCH TARGET**: {company}
**WEBSITE**: {website}
**LOCATION**: {country}
{industry_line}
**OBJECTIVE**: Find current, verified contact information for key personnel, \
executives, and general business contacts.

**SEARCH STRATEGY**:
1. Official company sources: website contact pages, about sections, team \
directories, impressum (German companies)
2. Professional networks: LinkedIn profiles, Xing profiles (German), business directories
3. Business intelligence: press releases, news articles, company announcements
4. Public records: business registrations, chamber of commerce listings

**OUTPUT FORMAT**:
Return a markdown table with these columns:
| Name | Role | Email | Phone | LinkedIn/Xing URL | Source | Confidence |

**GUIDELINES**:
- Focus on current employees and decision-makers
- Include general contact information (info@{domain}, contact@{domain}, sales@{domain})
- Mark estimated emails as \"(estimated)\"
- Provide confidence levels: High/Medium/Low
- For German companies, check impressum pages (legally required)

**SOURCES**: List all sources used with URLs as markdown links.

Begin comprehensive research for {company} now.",
        company = request.company,
        website = request.website,
        country = request.country,
        industry_line = industry_line,
        domain = domain,
    )
}

/// One chat-completion call. The three providers differ only in endpoint,
/// auth header and response shape.
pub async fn query(
    client: &Client,
    provider: AiProvider,
    model: &str,
    api_key: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let request = match provider {
        AiProvider::OpenRouter => client
            .post("https://openrouter.ai/api/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&json!({
                "model": model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0.1,
                "max_tokens": 4000,
            })),
        AiProvider::OpenAi => client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&json!({
                "model": model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": 0.1,
                "max_tokens": 4000,
            })),
        AiProvider::Anthropic => client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": model,
                "max_tokens": 4000,
                "messages": [{"role": "user", "content": prompt}],
            })),
    };

    let response = request.send().await.map_err(FetchError::from)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::BadStatus {
            provider: provider.name(),
            status: status.as_u16(),
        });
    }

    let body: serde_json::Value = response.json().await.map_err(|e| ProviderError::Malformed {
        provider: provider.name(),
        detail: e.to_string(),
    })?;

    let content_pointer = match provider {
        AiProvider::Anthropic => "/content/0/text",
        _ => "/choices/0/message/content",
    };
    body.pointer(content_pointer)
        .and_then(|v| v.as_str())
        .map(|text| text.to_string())
        .ok_or_else(|| ProviderError::Malformed {
            provider: provider.name(),
            detail: "no message content in response".to_string(),
        })
}

/// Outcome of the AI pass: the contacts it contributed plus the raw
/// report and its citations for the export layer.
pub struct AiOutcome {
    pub result: SourceResult,
    pub report: Option<String>,
    pub citations: Vec<Citation>,
}

/// Run the AI pass end to end. No key configured or a failed call both
/// degrade to an empty result.
pub async fn ai_pass(
    providers: &ProviderConfig,
    config: &ResearchConfig,
    request: &ResearchRequest,
) -> AiOutcome {
    let mut outcome = AiOutcome {
        result: SourceResult::empty(SOURCE_ID),
        report: None,
        citations: Vec::new(),
    };

    let Some((provider, api_key)) = AiProvider::select(providers) else {
        info!("No AI provider key configured, skipping AI research");
        return outcome;
    };

    let client = Client::builder()
        .timeout(Duration::from_secs(config.ai_timeout_seconds))
        .build()
        .expect("Failed to create HTTP client");

    info!(
        "Querying {} ({}) for contact research",
        provider.name(),
        providers.ai_model
    );
    let prompt = build_prompt(request);
    let report = match query(&client, provider, &providers.ai_model, &api_key, &prompt).await {
        Ok(report) => report,
        Err(e) => {
            warn!("AI research failed: {}", e);
            return outcome;
        }
    };

    if let Some(table) = report::parse_table(&report) {
        outcome
            .result
            .emails
            .extend(report::extract_report_emails(&table));
    }
    outcome.citations = report::extract_citations(&report);
    outcome.report = Some(report);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ResearchRequest {
        ResearchRequest {
            company: "Acme GmbH".to_string(),
            website: "https://acme.de".to_string(),
            country: "Germany".to_string(),
            industry: "Automotive".to_string(),
        }
    }

    #[test]
    fn prompt_names_target_and_table_format() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Acme GmbH"));
        assert!(prompt.contains("**INDUSTRY**: Automotive"));
        assert!(prompt.contains("| Name | Role | Email | Phone |"));
        assert!(prompt.contains("info@acme.de"));
    }

    #[test]
    fn industry_line_omitted_when_empty() {
        let mut req = request();
        req.industry = String::new();
        assert!(!build_prompt(&req).contains("**INDUSTRY**"));
    }

    #[test]
    fn provider_selection_order() {
        let providers = ProviderConfig {
            openrouter_api_key: Some("a".to_string()),
            anthropic_api_key: Some("b".to_string()),
            ..Default::default()
        };
        let (provider, key) = AiProvider::select(&providers).unwrap();
        assert_eq!(provider, AiProvider::OpenRouter);
        assert_eq!(key, "a");

        assert!(AiProvider::select(&ProviderConfig::default()).is_none());
    }

    #[tokio::test]
    async fn no_key_degrades_to_empty_outcome() {
        let outcome = ai_pass(
            &ProviderConfig::default(),
            &ResearchConfig::default(),
            &request(),
        )
        .await;
        assert!(outcome.result.is_empty());
        assert!(outcome.report.is_none());
    }
}
