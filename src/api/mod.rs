mod account;
mod files;
mod ideas;
mod query;

pub(crate) use query::{encode_queries, Query};

use crate::config::AppwriteConfig;
use crate::storage::{load_session_from_storage, remove_session_from_storage, save_session_to_storage};
use serde::Deserialize;

/// Header Appwrite uses to hand the session to clients that can't rely on cookies.
pub(crate) const FALLBACK_COOKIES_HEADER: &str = "X-Fallback-Cookies";
const PROJECT_HEADER: &str = "X-Appwrite-Project";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    /// Login refused because a session already exists for this client.
    SessionActive,
    Network,
    Http,
    Parse,
    /// Rejected locally before any request was sent.
    Validation,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ApiError {
    pub(crate) fn network(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
            status: None,
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
            status: None,
        }
    }

    pub(crate) fn validation(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Validation,
            message: e.to_string(),
            status: None,
        }
    }

    /// Classify a non-2xx Appwrite response (`{"message", "code", "type"}`).
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize, Default)]
        struct ErrorBody {
            #[serde(default)]
            message: String,
            #[serde(default, rename = "type")]
            error_type: String,
        }

        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        let message = if parsed.message.trim().is_empty() {
            format!("Request failed ({status}): {body}")
        } else {
            parsed.message
        };

        let lower = message.to_lowercase();
        let kind = if parsed.error_type == "user_session_already_exists"
            || lower.contains("session is active")
            || lower.contains("session is prohibited")
        {
            ApiErrorKind::SessionActive
        } else if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::Http
        };

        Self {
            kind,
            message,
            status: Some(status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Appwrite REST client.
///
/// Cheap to clone; the only mutable state is the fallback session cookie, which callers
/// persist with `save_to_storage` after logging in.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) config: AppwriteConfig,
    pub(crate) session: Option<String>,
}

impl ApiClient {
    pub fn new(config: AppwriteConfig) -> Self {
        Self {
            config: config.normalized(),
            session: None,
        }
    }

    pub fn load_from_storage(config: AppwriteConfig) -> Self {
        let mut client = Self::new(config);
        client.session = load_session_from_storage();
        client
    }

    pub fn save_to_storage(&self) {
        if let Some(session) = &self.session {
            save_session_to_storage(session);
        }
    }

    pub fn clear_storage() {
        remove_session_from_storage();
    }

    pub fn set_session(&mut self, session: String) {
        self.session = Some(session);
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn with_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req = req.header(PROJECT_HEADER, &self.config.project_id);
        if let Some(session) = &self.session {
            req = req.header(FALLBACK_COOKIES_HEADER, session);
        }
        req
    }

    /// Send a request and turn non-2xx responses into `ApiError`.
    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let res = self
            .with_headers(req)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let mut req = client.request(method, self.url(path));
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = self.send(req).await?;
        res.json().await.map_err(ApiError::parse)
    }

    async fn request_empty(&self, method: reqwest::Method, path: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let req = client.request(method, self.url(path));
        self.send(req).await.map(|_| ())
    }
}

/// Pull the fallback session cookie out of a response, if Appwrite sent one.
pub(crate) fn fallback_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(FALLBACK_COOKIES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "[]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_conflict_by_type() {
        let body = r#"{"message":"Creation of a session is prohibited when a session is active.","code":401,"type":"user_session_already_exists"}"#;
        let e = ApiError::from_response(401, body);
        assert_eq!(e.kind, ApiErrorKind::SessionActive);
        assert_eq!(e.status, Some(401));
        assert!(e.to_string().contains("session is active"));
    }

    #[test]
    fn test_session_conflict_by_message_only() {
        let body = r#"{"message":"Creation of a session is prohibited when a session is active."}"#;
        let e = ApiError::from_response(409, body);
        assert_eq!(e.kind, ApiErrorKind::SessionActive);
    }

    #[test]
    fn test_unauthorized_and_http_kinds() {
        let body = r#"{"message":"Invalid credentials.","code":401,"type":"user_invalid_credentials"}"#;
        let e = ApiError::from_response(401, body);
        assert!(e.is_unauthorized());
        assert_eq!(e.to_string(), "Invalid credentials.");

        let e = ApiError::from_response(500, "oops");
        assert_eq!(e.kind, ApiErrorKind::Http);
        assert_eq!(e.to_string(), "Request failed (500): oops");
    }

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new(AppwriteConfig {
            endpoint: "http://localhost/v1/".to_string(),
            ..Default::default()
        });
        assert_eq!(client.config.endpoint, "http://localhost/v1");
        assert_eq!(client.url("/account"), "http://localhost/v1/account");
        assert!(!client.has_session());
    }

    #[test]
    fn test_api_client_set_and_clear_session() {
        let mut client = ApiClient::new(AppwriteConfig::default());
        client.set_session("{\"a_session\":\"x\"}".to_string());
        assert!(client.has_session());
        client.clear_session();
        assert!(client.session.is_none());
    }
}
