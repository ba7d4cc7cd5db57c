//! Decoding of the serialized cookie strings kept in the credential store.
//!
//! Stored values come from hand-pasted browser exports, so they are not
//! reliably valid JSON. Three strategies are tried in order and the first one
//! producing a non-empty list wins:
//!
//! 1. strict parse of the cleaned string (array, or a single cookie object);
//! 2. the store's own convention: objects separated by commas with no outer
//!    brackets, parsed after wrapping in `[` `]`;
//! 3. a scan for flat `{...}` fragments, keeping each one that is a cookie.
//!
//! Decoding never fails; unrecoverable input yields an empty list.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Cookie;

static FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("fragment pattern is valid"));

/// Decode a stored cookie string into cookies. Returns an empty vector when
/// nothing recognizable is found.
#[must_use]
pub fn decode_cookies(raw: &str) -> Vec<Cookie> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }

    if let Some(cookies) = parse_strict(cleaned) {
        return cookies;
    }

    if let Some(cookies) = parse_bracket_wrapped(cleaned) {
        tracing::debug!(
            count = cookies.len(),
            "cookie string decoded by bracket wrapping"
        );
        return cookies;
    }

    let cookies = extract_fragments(cleaned);
    if cookies.is_empty() {
        tracing::warn!("cookie string could not be decoded; skipping record");
    } else {
        tracing::debug!(
            count = cookies.len(),
            "cookie string decoded by fragment scan"
        );
    }
    cookies
}

/// Trims whitespace and one pair of surrounding single quotes.
fn clean(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('\'').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('\'').unwrap_or(trimmed);
    trimmed.trim()
}

fn parse_strict(cleaned: &str) -> Option<Vec<Cookie>> {
    if let Ok(cookies) = serde_json::from_str::<Vec<Cookie>>(cleaned) {
        return non_empty(cookies);
    }
    serde_json::from_str::<Cookie>(cleaned)
        .ok()
        .map(|cookie| vec![cookie])
}

fn parse_bracket_wrapped(cleaned: &str) -> Option<Vec<Cookie>> {
    let wrapped = format!("[{cleaned}]");
    serde_json::from_str::<Vec<Cookie>>(&wrapped)
        .ok()
        .and_then(non_empty)
}

fn extract_fragments(cleaned: &str) -> Vec<Cookie> {
    FRAGMENT
        .find_iter(cleaned)
        .filter_map(|m| serde_json::from_str::<Cookie>(m.as_str()).ok())
        .collect()
}

fn non_empty(cookies: Vec<Cookie>) -> Option<Vec<Cookie>> {
    if cookies.is_empty() {
        None
    } else {
        Some(cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LI_AT: &str = r#"{"domain":".linkedin.com","name":"li_at","value":"AQED","path":"/"}"#;
    const JSESSION: &str =
        r#"{"domain":".www.linkedin.com","name":"JSESSIONID","value":"\"ajax:42\""}"#;

    #[test]
    fn decodes_plain_json_array() {
        let raw = format!("[{LI_AT},{JSESSION}]");
        let cookies = decode_cookies(&raw);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "li_at");
        assert_eq!(cookies[1].value, "\"ajax:42\"");
    }

    #[test]
    fn decodes_store_convention_without_brackets() {
        let raw = format!("'{LI_AT}, {JSESSION}'");
        let cookies = decode_cookies(&raw);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].domain.as_deref(), Some(".linkedin.com"));
    }

    #[test]
    fn decodes_single_object() {
        let cookies = decode_cookies(LI_AT);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "li_at");
    }

    #[test]
    fn recovers_fragments_from_malformed_input() {
        let raw = format!("garbage before {LI_AT} ,,, broken {{\"name\": }} {JSESSION} trailing");
        let cookies = decode_cookies(&raw);
        let names: Vec<&str> = cookies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["li_at", "JSESSIONID"]);
    }

    #[test]
    fn unparseable_input_yields_empty() {
        assert!(decode_cookies("not cookies at all").is_empty());
        assert!(decode_cookies("").is_empty());
        assert!(decode_cookies("''").is_empty());
        assert!(decode_cookies("[]").is_empty());
    }

    #[test]
    fn objects_without_name_and_value_are_not_cookies() {
        assert!(decode_cookies(r#"{"domain":".linkedin.com"}"#).is_empty());
    }
}
