//! Acceptance check for scraping-provider bodies.

use serde_json::Value;

/// Keys whose presence marks a bare object as profile-shaped.
const PROFILE_KEYS: &[&str] = &["profileId", "firstName", "lastName", "headline", "summary"];

/// `true` when a provider body plausibly contains profile data: a non-empty
/// array, an object with a non-empty `items` array, or an object carrying any
/// of [`PROFILE_KEYS`].
#[must_use]
pub fn is_plausible_profile(body: &Value) -> bool {
    match body {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => {
            has_items(map) || PROFILE_KEYS.iter().any(|key| map.contains_key(*key))
        }
        _ => false,
    }
}

/// The `items` array when the body has a non-empty one, otherwise the body
/// itself. An empty `items` next to profile keys keeps the whole object.
#[must_use]
pub fn into_sequence_form(body: Value) -> Value {
    match body {
        Value::Object(mut map) if has_items(&map) => map.remove("items").unwrap_or(Value::Null),
        other => other,
    }
}

fn has_items(map: &serde_json::Map<String, Value>) -> bool {
    matches!(map.get("items"), Some(Value::Array(items)) if !items.is_empty())
}
