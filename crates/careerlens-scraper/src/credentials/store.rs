//! Read-only client for the Firestore collection holding cookie exports.
//!
//! Each document maps a label (the account e-mail) to a serialized cookie
//! string. Only `stringValue` fields are returned; other field types are
//! ignored.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use careerlens_core::AppConfig;

use crate::error::ScraperError;

/// Upper bound on `nextPageToken` hops for one listing.
const MAX_PAGES: usize = 20;
const PAGE_SIZE: &str = "300";

#[derive(Debug, Clone)]
pub struct CredentialStoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout_secs: u64,
}

impl CredentialStoreConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.firestore_base_url.clone(),
            project_id: config.firestore_project_id.clone(),
            api_key: config.firestore_api_key.clone(),
            collection: config.credentials_collection.clone(),
            timeout_secs: 30,
        }
    }
}

/// One store document: its id and the label→string fields it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDocument {
    pub id: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, FirestoreValue>,
}

#[derive(Debug, Deserialize)]
struct FirestoreValue {
    #[serde(rename = "stringValue")]
    string_value: Option<String>,
}

pub struct FirestoreClient {
    client: Client,
    documents_url: Url,
    api_key: Option<String>,
}

impl FirestoreClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ScraperError::InvalidUrl`] if the configured base URL is unusable.
    pub fn new(config: &CredentialStoreConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let raw = format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.collection
        );
        let documents_url = Url::parse(&raw).map_err(|e| ScraperError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Lists every document of the collection, following pagination.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::Provider`] on a non-2xx answer.
    /// - [`ScraperError::Deserialize`] if the listing is not the expected shape.
    pub async fn list_documents(&self) -> Result<Vec<CredentialDocument>, ScraperError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(page_token.as_deref()).await?;
            documents.extend(page.documents.into_iter().map(into_credential_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(documents),
            }
        }

        tracing::warn!(
            max_pages = MAX_PAGES,
            fetched = documents.len(),
            "credential store listing hit the page cap; using what was fetched"
        );
        Ok(documents)
    }

    async fn fetch_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, ScraperError> {
        let mut url = self.documents_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("pageSize", PAGE_SIZE);
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScraperError::Provider {
                status: status.as_u16(),
                body: serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: "credential store document listing".to_owned(),
            source: e,
        })
    }
}

fn into_credential_document(doc: FirestoreDocument) -> CredentialDocument {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .unwrap_or(doc.name.as_str())
        .to_owned();
    let fields = doc
        .fields
        .into_iter()
        .filter_map(|(label, value)| value.string_value.map(|s| (label, s)))
        .collect();
    CredentialDocument { id, fields }
}
