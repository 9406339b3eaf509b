//! Inertia protocol header names and parsing helpers

/// Marks a client-driven navigation (request) and a data response (response).
pub const X_INERTIA: &str = "X-Inertia";

/// Asset version cached by the client.
pub const X_INERTIA_VERSION: &str = "X-Inertia-Version";

/// Component targeted by a partial reload.
pub const X_INERTIA_PARTIAL_COMPONENT: &str = "X-Inertia-Partial-Component";

/// Comma-separated prop keys requested by a partial reload.
pub const X_INERTIA_PARTIAL_DATA: &str = "X-Inertia-Partial-Data";

/// Reload target sent with a 409 version conflict.
pub const X_INERTIA_LOCATION: &str = "X-Inertia-Location";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const VARY: &str = "Vary";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Request headers captured into a request scope.
pub(crate) const PROTOCOL_REQUEST_HEADERS: [&str; 4] = [
    X_INERTIA,
    X_INERTIA_VERSION,
    X_INERTIA_PARTIAL_COMPONENT,
    X_INERTIA_PARTIAL_DATA,
];

/// Whether a marker header value counts as set.
///
/// Empty values and `"0"` are treated as absent.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "0")
}

/// Split an `X-Inertia-Partial-Data` value into prop keys.
///
/// Tokens are trimmed and empty tokens are dropped, so `" , "` yields no keys.
pub fn parse_partial_data(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some("1")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(None));
    }

    #[test]
    fn test_parse_partial_data_trims_keys() {
        assert_eq!(parse_partial_data("title, user ,posts"), vec!["title", "user", "posts"]);
    }

    #[test]
    fn test_parse_partial_data_drops_empty_tokens() {
        assert!(parse_partial_data("").is_empty());
        assert!(parse_partial_data(" , ,").is_empty());
        assert_eq!(parse_partial_data("title,,"), vec!["title"]);
    }
}
