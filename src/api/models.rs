use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /yoink`
#[derive(Debug, Clone, Serialize)]
pub struct YoinkRequest<'a> {
    pub url: &'a str,
}

/// Response from the /yoink endpoint on a 2xx
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YoinkResponse {
    pub status: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl YoinkResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Error body returned with a non-2xx status.
///
/// `detail` is usually a string, but validation failures report a list of
/// objects instead, so it is kept as a raw value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<Value>,
}

/// Returns the detail text when it is a non-empty string.
pub fn detail_text(detail: Option<&Value>) -> Option<String> {
    match detail {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Response from the /health endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        Self {
            base_url: if trimmed.is_empty() {
                DEFAULT_API_URL.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_is_exact() {
        let body = serde_json::to_string(&YoinkRequest {
            url: "https://example.com/video",
        })
        .unwrap();
        assert_eq!(body, r#"{"url":"https://example.com/video"}"#);
    }

    #[test]
    fn base_url_is_trimmed() {
        assert_eq!(ApiConfig::new("http://api:8000/").base_url(), "http://api:8000");
        assert_eq!(ApiConfig::new("  ").base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn detail_only_accepts_strings() {
        assert_eq!(
            detail_text(Some(&json!("Invalid URL"))),
            Some("Invalid URL".to_string())
        );
        assert_eq!(detail_text(Some(&json!(""))), None);
        assert_eq!(detail_text(Some(&json!([{"msg": "field required"}]))), None);
        assert_eq!(detail_text(None), None);
    }
}
