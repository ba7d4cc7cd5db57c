//! Canonical profile fields from whatever shape the provider returned.
//!
//! Every extractor is total: any JSON value, including `null` and malformed
//! shapes, yields a string. Array input is read through its first element.

use serde::Serialize;
use serde_json::Value;

pub const UNKNOWN_NAME: &str = "LinkedIn User";
pub const UNKNOWN_HEADLINE: &str = "LinkedIn Professional";
pub const UNKNOWN_LOCATION: &str = "Location not specified";

/// The profile block of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub profile_url: String,
}

/// Summarizes `profile` for the report returned for `profile_url`.
#[must_use]
pub fn summarize(profile: &Value, profile_url: &str) -> ProfileSummary {
    ProfileSummary {
        name: extract_name(profile),
        headline: extract_headline(profile),
        location: extract_location(profile),
        profile_url: profile_url.to_owned(),
    }
}

/// `firstName lastName` when both are present, else `name`, else `title`.
#[must_use]
pub fn extract_name(profile: &Value) -> String {
    let Some(record) = record_of(profile) else {
        return UNKNOWN_NAME.to_owned();
    };

    if let (Some(first), Some(last)) = (text(record, "firstName"), text(record, "lastName")) {
        return format!("{first} {last}");
    }

    first_text(record, &["name", "title"]).unwrap_or_else(|| UNKNOWN_NAME.to_owned())
}

#[must_use]
pub fn extract_headline(profile: &Value) -> String {
    record_of(profile)
        .and_then(|record| first_text(record, &["headline", "subTitle", "occupation"]))
        .unwrap_or_else(|| UNKNOWN_HEADLINE.to_owned())
}

#[must_use]
pub fn extract_location(profile: &Value) -> String {
    record_of(profile)
        .and_then(|record| first_text(record, &["location", "locationName", "geoLocation"]))
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_owned())
}

/// The object the extractors read: the first array element, or the value
/// itself when it is an object.
fn record_of(profile: &Value) -> Option<&serde_json::Map<String, Value>> {
    match profile {
        Value::Array(items) => items.first().and_then(Value::as_object),
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn first_text(record: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(record, key))
}

/// Non-blank string value of `key`, trimmed.
fn text(record: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
