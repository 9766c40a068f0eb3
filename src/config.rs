use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchConfig {
    /// Upper bound on contact-page URLs fetched during one scrape pass.
    pub max_pages: usize,
    pub page_timeout_seconds: u64,
    pub search_timeout_seconds: u64,
    pub whois_timeout_seconds: u64,
    pub ai_timeout_seconds: u64,
    /// Randomized inter-request delay for the scrape pass. This is a
    /// rate-limiting contract with the crawled site, not a tunable.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_search_results: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_pages: 15,
            page_timeout_seconds: 15,
            search_timeout_seconds: 30,
            whois_timeout_seconds: 10,
            ai_timeout_seconds: 120,
            min_delay_ms: 1000,
            max_delay_ms: 2000,
            max_search_results: 5,
        }
    }
}

/// API keys for the optional providers. Loaded from the environment so
/// config.yml can stay checked in; absent keys disable the provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub tavily_api_key: Option<String>,
    #[serde(default)]
    pub bing_api_key: Option<String>,
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default = "default_ai_model")]
    pub ai_model: String,
}

fn default_ai_model() -> String {
    "perplexity/llama-3-sonar-large-online".to_string()
}

impl ProviderConfig {
    /// Fill any key missing from config.yml from the environment.
    pub fn with_env_keys(mut self) -> Self {
        let from_env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        self.tavily_api_key = self.tavily_api_key.or_else(|| from_env("TAVILY_API_KEY"));
        self.bing_api_key = self.bing_api_key.or_else(|| from_env("BING_API_KEY"));
        self.openrouter_api_key = self
            .openrouter_api_key
            .or_else(|| from_env("OPENROUTER_API_KEY"));
        self.openai_api_key = self.openai_api_key.or_else(|| from_env("OPENAI_API_KEY"));
        self.anthropic_api_key = self
            .anthropic_api_key
            .or_else(|| from_env("ANTHROPIC_API_KEY"));
        if self.ai_model.is_empty() {
            self.ai_model = default_ai_model();
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "out".to_string(),
            pretty_json: true,
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let mut config: Config = serde_yaml::from_str(&content)?;
    config.providers = config.providers.with_env_keys();
    Ok(config)
}
