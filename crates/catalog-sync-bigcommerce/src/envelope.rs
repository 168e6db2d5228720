use serde::Deserialize;

/// Success envelope of the v3 API: `{ "data": ..., "meta": {...} }`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Error body of the v3 API.
/// `{ "status": 422, "title": "...", "type": "...", "errors": {...} }`
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub title: Option<String>,
}

impl ErrorBody {
    /// Best-effort title from a raw error body.
    pub fn title_of(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.title)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_error_body() {
        let body = r#"{"status":422,"title":"Listing already exists","type":"/api-docs/errors"}"#;
        assert_eq!(
            ErrorBody::title_of(body).as_deref(),
            Some("Listing already exists")
        );
    }

    #[test]
    fn title_missing_for_non_json() {
        assert_eq!(ErrorBody::title_of("<html>bad gateway</html>"), None);
        assert_eq!(ErrorBody::title_of(r#"{"title":""}"#), None);
    }
}
