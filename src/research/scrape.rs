// src/research/scrape.rs
use crate::config::ResearchConfig;
use crate::error::FetchError;
use crate::extractor::{
    self, contacts::plausible_phone, ContactExtractor, NormalizedPage,
};
use crate::models::{PageStat, SourceResult};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const SOURCE_ID: &str = "website";

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
];

/// Contact-page path candidates, multi-language. Tried in order after the
/// base URL itself, in both lower- and uppercase forms.
const CONTACT_PATHS: &[&str] = &[
    // English
    "/contact",
    "/contact-us",
    "/contact.html",
    "/contact.php",
    "/about",
    "/about-us",
    "/about.html",
    "/team",
    "/staff",
    "/people",
    "/leadership",
    "/management",
    "/executives",
    "/directory",
    // German
    "/kontakt",
    "/kontakt.html",
    "/impressum",
    "/impressum.html",
    "/ueber-uns",
    "/mitarbeiter",
    "/ansprechpartner",
    // French
    "/nous-contacter",
    "/equipe",
    "/a-propos",
    // Spanish
    "/contacto",
    "/equipo",
    "/sobre-nosotros",
    // Common variations
    "/en/contact",
    "/de/kontakt",
    "/fr/contact",
    "/es/contacto",
    "/company",
    "/corporate",
    "/office",
    "/locations",
];

pub struct WebsiteScraper {
    client: Client,
    extractor: ContactExtractor,
    config: ResearchConfig,
}

impl WebsiteScraper {
    pub fn new(config: ResearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.page_timeout_seconds))
            // Small-business sites routinely ship broken cert chains.
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            extractor: ContactExtractor::new(),
            config,
        }
    }

    /// Scrape the site's likely contact pages sequentially. A failed URL
    /// degrades to an empty result for that page; partial results stay
    /// valid if the loop is interrupted between URLs.
    pub async fn scrape(&self, base_url: &str) -> (SourceResult, Vec<PageStat>) {
        let mut result = SourceResult::empty(SOURCE_ID);
        let mut stats = Vec::new();

        let urls = match self.candidate_urls(base_url) {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Cannot derive scrape URLs from {}: {}", base_url, e);
                return (result, stats);
            }
        };

        let total = urls.len().min(self.config.max_pages);
        info!("Scraping {} candidate pages of {}", total, base_url);

        for (i, url) in urls.iter().take(self.config.max_pages).enumerate() {
            debug!("Fetching page {}/{}: {}", i + 1, total, url);

            match self.safe_request(url).await {
                Ok(body) => {
                    let page = extractor::normalize(&body);
                    let (emails, phones) = self.page_contacts(&page);
                    stats.push(PageStat {
                        url: url.clone(),
                        emails_found: emails.len(),
                        phones_found: phones.len(),
                        status: "success".to_string(),
                    });
                    result.emails.extend(emails);
                    result.phones.extend(phones);
                }
                Err(e) => {
                    debug!("Skipping {}: {}", url, e);
                    stats.push(PageStat {
                        url: url.clone(),
                        emails_found: 0,
                        phones_found: 0,
                        status: format!("error: {}", e),
                    });
                }
            }

            // Mandatory randomized delay between requests. Rate-limiting
            // contract with the crawled site; do not remove.
            if i + 1 < total {
                let delay =
                    fastrand::u64(self.config.min_delay_ms..=self.config.max_delay_ms);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }

        info!(
            "Scrape of {} found {} emails, {} phones",
            base_url,
            result.emails.len(),
            result.phones.len()
        );
        (result, stats)
    }

    /// Free-text extraction plus the out-of-band mailto/tel/JSON-LD
    /// candidates, all passed through the same validation.
    fn page_contacts(&self, page: &NormalizedPage) -> (HashSet<String>, HashSet<String>) {
        let (mut emails, mut phones) = extractor::extract_validated(&self.extractor, &page.text);

        for email in &page.emails {
            if extractor::is_valid_email(email) {
                emails.insert(email.to_lowercase());
            }
        }
        for phone in &page.phones {
            if plausible_phone(phone) {
                phones.insert(phone.clone());
            }
        }

        (emails, phones)
    }

    fn candidate_urls(&self, base_url: &str) -> Result<Vec<String>, url::ParseError> {
        let parsed = Url::parse(base_url)?;
        let base_path = parsed.origin().ascii_serialization();

        let mut urls = vec![base_url.to_string()];
        let mut seen: HashSet<String> = urls.iter().cloned().collect();
        for path in CONTACT_PATHS {
            for candidate in [
                format!("{}{}", base_path, path),
                format!("{}{}", base_path, path.to_uppercase()),
            ] {
                if seen.insert(candidate.clone()) {
                    urls.push(candidate);
                }
            }
        }
        Ok(urls)
    }

    async fn safe_request(&self, url: &str) -> Result<String, FetchError> {
        let user_agent = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];
        let response = self
            .client
            .get(url)
            .header("User-Agent", user_agent)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> ResearchConfig {
        ResearchConfig {
            max_pages: 2,
            min_delay_ms: 1,
            max_delay_ms: 2,
            ..ResearchConfig::default()
        }
    }

    #[test]
    fn candidate_urls_start_with_base_and_include_impressum() {
        let scraper = WebsiteScraper::new(quick_config());
        let urls = scraper.candidate_urls("https://acme.de/start").unwrap();
        assert_eq!(urls[0], "https://acme.de/start");
        assert!(urls.contains(&"https://acme.de/impressum".to_string()));
        assert!(urls.contains(&"https://acme.de/IMPRESSUM".to_string()));
        // No duplicates even though path lists overlap.
        let unique: HashSet<&String> = urls.iter().collect();
        assert_eq!(unique.len(), urls.len());
    }

    #[tokio::test]
    async fn scrape_collects_contacts_and_degrades_failed_pages() {
        let mut server = mockito::Server::new_async().await;
        let _root = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(
                r#"<html><body>
                   <p>Mail sales@acme-widgets.com or call 555-123-4567.</p>
                   <a href="mailto:ceo@acme-widgets.com">Boss</a>
                   </body></html>"#,
            )
            .create_async()
            .await;

        let scraper = WebsiteScraper::new(quick_config());
        let (result, stats) = scraper.scrape(&format!("{}/", server.url())).await;

        assert!(result.emails.contains("sales@acme-widgets.com"));
        assert!(result.emails.contains("ceo@acme-widgets.com"));
        assert_eq!(result.phones.len(), 1);
        // Second candidate URL is unmocked and fails, but the pass still
        // reports the successful page.
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].status, "success");
        assert!(stats[1].status.starts_with("error:"));
    }

    #[tokio::test]
    async fn safe_request_maps_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/contact")
            .with_status(404)
            .create_async()
            .await;

        let scraper = WebsiteScraper::new(quick_config());
        let err = scraper
            .safe_request(&format!("{}/contact", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }
}
