//! Thin client for the OpenAI Assistants v2 thread protocol.
//!
//! Only the calls the engine needs are exposed: create a thread, post a user
//! message, start a run, read a run, list messages.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AnalysisError;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VALUE: &str = "assistants=v2";

#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<MessageText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageText {
    pub value: String,
}

impl MessageList {
    /// Text of the newest assistant message, its `text` fragments joined with
    /// newlines. `None` when there is no assistant message or it has no text.
    ///
    /// Messages are requested newest first, so the first assistant entry is
    /// the latest.
    #[must_use]
    pub fn latest_assistant_text(&self) -> Option<String> {
        let message = self.data.iter().find(|m| m.role == "assistant")?;
        let fragments: Vec<&str> = message
            .content
            .iter()
            .filter(|c| c.kind == "text")
            .filter_map(|c| c.text.as_ref().map(|t| t.value.as_str()))
            .collect();

        let joined = fragments.join("\n");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

pub struct AssistantClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AssistantClient {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    /// # Errors
    ///
    /// See [`AssistantClient::send`].
    pub async fn create_thread(&self) -> Result<Thread, AnalysisError> {
        let request = self.post("/threads").json(&json!({}));
        self.send(request, "create thread").await
    }

    /// Posts `content` as a user turn.
    ///
    /// # Errors
    ///
    /// See [`AssistantClient::send`].
    pub async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<(), AnalysisError> {
        let request = self
            .post(&format!("/threads/{thread_id}/messages"))
            .json(&json!({ "role": "user", "content": content }));
        self.send::<Value>(request, "add message").await.map(|_| ())
    }

    /// Starts a run asking for a JSON object response.
    ///
    /// # Errors
    ///
    /// See [`AssistantClient::send`].
    pub async fn start_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, AnalysisError> {
        let request = self
            .post(&format!("/threads/{thread_id}/runs"))
            .json(&json!({
                "assistant_id": assistant_id,
                "response_format": { "type": "json_object" }
            }));
        self.send(request, "start run").await
    }

    /// # Errors
    ///
    /// See [`AssistantClient::send`].
    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AnalysisError> {
        let request = self.get(&format!("/threads/{thread_id}/runs/{run_id}"));
        self.send(request, "get run").await
    }

    /// Lists thread messages, newest first.
    ///
    /// # Errors
    ///
    /// See [`AssistantClient::send`].
    pub async fn list_messages(&self, thread_id: &str) -> Result<MessageList, AnalysisError> {
        let request = self
            .get(&format!("/threads/{thread_id}/messages"))
            .query(&[("order", "desc"), ("limit", "20")]);
        self.send(request, "list messages").await
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.post(format!("{}{path}", self.base_url)))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}{path}", self.base_url)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER, BETA_VALUE)
    }

    /// Sends `request` and decodes the body.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Http`] on network failure or timeout.
    /// - [`AnalysisError::Api`] on a non-2xx answer, with the provider body.
    /// - [`AnalysisError::Deserialize`] if the body is not the expected shape.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, AnalysisError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body: serde_json::from_str(&text).unwrap_or(Value::String(text)),
            });
        }

        serde_json::from_str(&text).map_err(|e| AnalysisError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
