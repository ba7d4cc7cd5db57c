use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx answer from an upstream provider. `body` is the provider's own
    /// error payload, kept verbatim (a JSON string when it was not JSON).
    #[error("provider returned HTTP {status}: {body}")]
    Provider {
        status: u16,
        body: serde_json::Value,
    },

    #[error("credential store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("no credential sets available")]
    NoCredentialsAvailable,

    #[error("payload shape {shape} returned data that does not look like a profile")]
    UnrecognizedResponse { shape: &'static str },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("profile fetch exhausted after {attempts} attempts; last error: {}", describe_last(.last_error))]
    ProfileFetchExhausted {
        attempts: u32,
        last_error: Option<Box<ScraperError>>,
    },
}

fn describe_last(last: &Option<Box<ScraperError>>) -> String {
    last.as_ref()
        .map_or_else(|| "none recorded".to_owned(), ToString::to_string)
}

impl ScraperError {
    /// `true` for failures to obtain a credential set. The fetch loop treats
    /// both kinds the same way: move on to the next attempt.
    #[must_use]
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::NoCredentialsAvailable | Self::UpstreamUnavailable(_)
        )
    }

    /// Status and body of the provider response behind this error, looking
    /// through [`ScraperError::ProfileFetchExhausted`].
    #[must_use]
    pub fn provider_details(&self) -> Option<(u16, &serde_json::Value)> {
        match self {
            Self::Provider { status, body } => Some((*status, body)),
            Self::ProfileFetchExhausted {
                last_error: Some(last),
                ..
            } => last.provider_details(),
            _ => None,
        }
    }

    /// Message of the innermost recorded cause.
    #[must_use]
    pub fn root_message(&self) -> String {
        match self {
            Self::ProfileFetchExhausted {
                last_error: Some(last),
                ..
            } => last.root_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_display_includes_last_error() {
        let err = ScraperError::ProfileFetchExhausted {
            attempts: 3,
            last_error: Some(Box::new(ScraperError::NoCredentialsAvailable)),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempts"), "{msg}");
        assert!(msg.contains("no credential sets available"), "{msg}");
    }

    #[test]
    fn exhausted_without_cause_still_renders() {
        let err = ScraperError::ProfileFetchExhausted {
            attempts: 1,
            last_error: None,
        };
        assert!(err.to_string().contains("none recorded"));
    }

    #[test]
    fn provider_details_look_through_exhaustion() {
        let err = ScraperError::ProfileFetchExhausted {
            attempts: 3,
            last_error: Some(Box::new(ScraperError::Provider {
                status: 402,
                body: serde_json::json!({"error": {"type": "not-enough-usage"}}),
            })),
        };
        let (status, body) = err.provider_details().expect("details");
        assert_eq!(status, 402);
        assert_eq!(body["error"]["type"], "not-enough-usage");
    }

    #[test]
    fn credential_failures_are_classified() {
        assert!(ScraperError::NoCredentialsAvailable.is_credential_failure());
        assert!(ScraperError::UpstreamUnavailable("down".to_owned()).is_credential_failure());
        assert!(!ScraperError::UnrecognizedResponse { shape: "input.urls" }.is_credential_failure());
    }
}
