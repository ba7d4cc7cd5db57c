//! Value types shared by the credential source and the profile fetcher.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// One browser session cookie as exported from the browser.
///
/// Only `name` and `value` are required. Everything else (`path`, `secure`,
/// `expirationDate`, ...) is kept in `attributes` and sent back to the
/// provider untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

/// A bundle of cookies authenticating one scraping session.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialSet {
    /// Label of the store field the set came from (usually an e-mail).
    pub source: String,
    pub cookies: Vec<Cookie>,
}

impl CredentialSet {
    #[must_use]
    pub fn new(source: impl Into<String>, cookies: Vec<Cookie>) -> Self {
        Self {
            source: source.into(),
            cookies,
        }
    }

    /// SHA-256 over the canonical JSON of the cookie list.
    ///
    /// Attribute keys live in a `BTreeMap`, so two sets with the same cookies
    /// hash identically regardless of the key order they were stored with.
    /// The `source` label is not part of the fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(&self.cookies).unwrap_or_default();
        format!("{:x}", Sha256::digest(&canonical))
    }

    /// Structural equality by content fingerprint.
    #[must_use]
    pub fn same_cookies(&self, other: &CredentialSet) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

/// A provider body that passed the plausible-profile check, normalized to
/// sequence form: the `items` array when the body had one, else the body.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedProfile(Value);

impl ScrapedProfile {
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self(data)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}
