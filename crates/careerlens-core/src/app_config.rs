use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub rate_limit_per_minute: usize,

    pub firestore_base_url: String,
    pub firestore_project_id: String,
    pub firestore_api_key: Option<String>,
    pub credentials_collection: String,

    pub scraper_endpoint: String,
    pub scraper_api_token: String,
    pub scraper_timeout_secs: u64,
    pub scraper_max_attempts: u32,

    pub openai_base_url: String,
    pub openai_api_key: String,
    pub openai_assistant_id: String,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub llm_retry_backoff_ms: u64,
    pub llm_poll_interval_ms: u64,
    pub llm_max_polls: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("firestore_base_url", &self.firestore_base_url)
            .field("firestore_project_id", &self.firestore_project_id)
            .field(
                "firestore_api_key",
                &self.firestore_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("credentials_collection", &self.credentials_collection)
            .field("scraper_endpoint", &self.scraper_endpoint)
            .field("scraper_api_token", &"[redacted]")
            .field("scraper_timeout_secs", &self.scraper_timeout_secs)
            .field("scraper_max_attempts", &self.scraper_max_attempts)
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_api_key", &"[redacted]")
            .field("openai_assistant_id", &self.openai_assistant_id)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_attempts", &self.llm_max_attempts)
            .field("llm_retry_backoff_ms", &self.llm_retry_backoff_ms)
            .field("llm_poll_interval_ms", &self.llm_poll_interval_ms)
            .field("llm_max_polls", &self.llm_max_polls)
            .finish()
    }
}
