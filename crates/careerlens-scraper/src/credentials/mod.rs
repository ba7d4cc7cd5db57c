//! Credential rotation over the remote cookie store.

mod decode;
mod store;

use rand::Rng;

pub use decode::decode_cookies;
pub use store::{CredentialDocument, CredentialStoreConfig, FirestoreClient};

use crate::error::ScraperError;
use crate::types::CredentialSet;

/// Supplies credential sets read fresh from the store on every call.
pub struct CredentialSource {
    store: FirestoreClient,
}

impl CredentialSource {
    #[must_use]
    pub fn new(store: FirestoreClient) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] or [`ScraperError::InvalidUrl`] if the
    /// store client cannot be built.
    pub fn from_config(config: &CredentialStoreConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(FirestoreClient::new(config)?))
    }

    /// Every eligible credential set in the store.
    ///
    /// Records that decode to no cookies are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UpstreamUnavailable`] if the store cannot be
    /// read, holds no documents, or holds no eligible record.
    pub async fn list_all(&self) -> Result<Vec<CredentialSet>, ScraperError> {
        let documents = self
            .store
            .list_documents()
            .await
            .map_err(|e| ScraperError::UpstreamUnavailable(e.to_string()))?;

        if documents.is_empty() {
            return Err(ScraperError::UpstreamUnavailable(
                "credential store returned no documents".to_owned(),
            ));
        }

        let sets = sets_from_documents(&documents);
        if sets.is_empty() {
            return Err(ScraperError::UpstreamUnavailable(format!(
                "none of {} credential documents held a decodable cookie set",
                documents.len()
            )));
        }

        tracing::debug!(
            documents = documents.len(),
            sets = sets.len(),
            "credential sets listed"
        );
        Ok(sets)
    }

    /// A uniformly random credential set.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialSource::list_all`] failures, and returns
    /// [`ScraperError::NoCredentialsAvailable`] if the listing is empty.
    pub async fn random(&self) -> Result<CredentialSet, ScraperError> {
        self.next_untried(&[]).await
    }

    /// A uniformly random set not matching any of `tried`; once every set has
    /// been tried, any set from the full population.
    ///
    /// # Errors
    ///
    /// Same as [`CredentialSource::random`].
    pub async fn next_untried(
        &self,
        tried: &[CredentialSet],
    ) -> Result<CredentialSet, ScraperError> {
        let all = self.list_all().await?;
        let picked = {
            let mut rng = rand::rng();
            pick_untried(all, tried, &mut rng)
        };
        picked.ok_or(ScraperError::NoCredentialsAvailable)
    }
}

/// Decodes every string field of every document into a credential set.
#[must_use]
pub fn sets_from_documents(documents: &[CredentialDocument]) -> Vec<CredentialSet> {
    let mut sets = Vec::new();
    for document in documents {
        for (label, raw) in &document.fields {
            let cookies = decode_cookies(raw);
            if cookies.is_empty() {
                tracing::warn!(
                    document = %document.id,
                    source = %label,
                    "credential record skipped: no cookies decoded"
                );
                continue;
            }
            sets.push(CredentialSet::new(label.clone(), cookies));
        }
    }
    sets
}

/// Uniform choice among sets whose fingerprint is absent from `tried`,
/// degrading to the full population when all have been tried. `None` only
/// when `all` is empty.
pub fn pick_untried<R: Rng + ?Sized>(
    mut all: Vec<CredentialSet>,
    tried: &[CredentialSet],
    rng: &mut R,
) -> Option<CredentialSet> {
    if all.is_empty() {
        return None;
    }

    let tried_prints: Vec<String> = tried.iter().map(CredentialSet::fingerprint).collect();
    let mut untried: Vec<CredentialSet> = all
        .iter()
        .filter(|set| !tried_prints.contains(&set.fingerprint()))
        .cloned()
        .collect();

    let pool = if untried.is_empty() {
        tracing::debug!(
            population = all.len(),
            "every credential set already tried; reusing the full population"
        );
        &mut all
    } else {
        &mut untried
    };

    let index = rng.random_range(0..pool.len());
    Some(pool.swap_remove(index))
}
