//! Profile fetch against the scraping provider's run-sync endpoint.
//!
//! The provider's input schema is loosely documented, so every credential set
//! is tried with each [`PayloadShape`] in turn. The first plausible body wins.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use careerlens_core::AppConfig;

use crate::credentials::CredentialSource;
use crate::error::ScraperError;
use crate::types::{CredentialSet, ScrapedProfile};
use crate::validate::{into_sequence_form, is_plausible_profile};

const USER_AGENT: &str = concat!("careerlens/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Full run-sync URL of the provider actor; the token is appended as a
    /// query parameter.
    pub endpoint: String,
    pub api_token: String,
    pub timeout_secs: u64,
    /// Number of credential sets tried before giving up.
    pub max_attempts: u32,
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            endpoint: config.scraper_endpoint.clone(),
            api_token: config.scraper_api_token.clone(),
            timeout_secs: config.scraper_timeout_secs,
            max_attempts: config.scraper_max_attempts,
        }
    }
}

/// Request body layouts tried against the provider, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{input: {urls, cookie, proxy}}`
    InputUrls,
    /// `{input: {profileUrls, cookie, proxy}}`
    InputProfileUrls,
    /// `{urls, cookie, proxy}`
    FlatUrls,
}

impl PayloadShape {
    pub const ALL: [PayloadShape; 3] = [Self::InputUrls, Self::InputProfileUrls, Self::FlatUrls];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InputUrls => "input.urls",
            Self::InputProfileUrls => "input.profileUrls",
            Self::FlatUrls => "urls",
        }
    }

    /// Builds the request body for `profile_url` authenticated by `credentials`.
    #[must_use]
    pub fn body(self, profile_url: &str, credentials: &CredentialSet) -> Value {
        let proxy = json!({ "useApifyProxy": true });
        let cookie = json!(credentials.cookies);
        match self {
            Self::InputUrls => json!({
                "input": { "urls": [profile_url], "cookie": cookie, "proxy": proxy }
            }),
            Self::InputProfileUrls => json!({
                "input": { "profileUrls": [profile_url], "cookie": cookie, "proxy": proxy }
            }),
            Self::FlatUrls => json!({
                "urls": [profile_url], "cookie": cookie, "proxy": proxy
            }),
        }
    }
}

/// Fetches a profile, rotating credential sets and payload shapes.
///
/// At most `max_attempts × 3` provider calls are made per fetch.
pub struct ProfileFetcher {
    client: Client,
    config: ScraperConfig,
    credentials: CredentialSource,
}

impl ProfileFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: ScraperConfig, credentials: CredentialSource) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    /// Fetches `profile_url` and returns the accepted body in sequence form.
    ///
    /// Credential acquisition failures and exhausted payload shapes both move
    /// on to the next attempt; the first plausible body stops everything.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::ProfileFetchExhausted`] carrying the last
    /// observed error once every attempt has failed.
    pub async fn fetch(&self, profile_url: &str) -> Result<ScrapedProfile, ScraperError> {
        let max_attempts = self.config.max_attempts;
        let mut tried: Vec<CredentialSet> = Vec::new();
        let mut last_error: Option<ScraperError> = None;

        for attempt in 1..=max_attempts {
            let credentials = if attempt == 1 {
                self.credentials.random().await
            } else {
                self.credentials.next_untried(&tried).await
            };

            let credentials = match credentials {
                Ok(set) => set,
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "could not obtain a credential set"
                    );
                    last_error = Some(e);
                    continue;
                }
            };

            tracing::info!(
                attempt,
                max_attempts,
                source = %credentials.source,
                cookies = credentials.cookies.len(),
                "fetching profile"
            );

            match self.try_payload_shapes(profile_url, &credentials, attempt).await {
                Ok(profile) => return Ok(profile),
                Err(e) => last_error = Some(e),
            }
            tried.push(credentials);
        }

        Err(ScraperError::ProfileFetchExhausted {
            attempts: max_attempts,
            last_error: last_error.map(Box::new),
        })
    }

    async fn try_payload_shapes(
        &self,
        profile_url: &str,
        credentials: &CredentialSet,
        attempt: u32,
    ) -> Result<ScrapedProfile, ScraperError> {
        let fingerprint = credentials.fingerprint();
        let credential = &fingerprint[..12.min(fingerprint.len())];
        let mut last_error = None;

        for shape in PayloadShape::ALL {
            let outcome = self
                .post(&shape.body(profile_url, credentials))
                .await
                .and_then(|body| {
                    if is_plausible_profile(&body) {
                        Ok(body)
                    } else {
                        Err(ScraperError::UnrecognizedResponse {
                            shape: shape.label(),
                        })
                    }
                });

            match outcome {
                Ok(body) => {
                    tracing::info!(attempt, credential, shape = shape.label(), "profile accepted");
                    return Ok(ScrapedProfile::new(into_sequence_form(body)));
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        credential,
                        shape = shape.label(),
                        error = %e,
                        "payload shape failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ScraperError::UnrecognizedResponse {
            shape: PayloadShape::FlatUrls.label(),
        }))
    }

    async fn post(&self, body: &Value) -> Result<Value, ScraperError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("token", self.config.api_token.as_str())])
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ScraperError::Provider {
                status: status.as_u16(),
                body: serde_json::from_str(&text).unwrap_or(Value::String(text)),
            });
        }

        serde_json::from_str(&text).map_err(|e| ScraperError::Deserialize {
            context: "scraping provider response".to_owned(),
            source: e,
        })
    }
}
