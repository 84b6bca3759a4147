use std::fmt;
use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::session_service::TokenSource;
use crate::error::{DashboardError, Result};

/// List endpoints answer with either a bare array or a `results` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Bare(Vec<T>),
    Results { results: Vec<T> },
    Data { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Results { results: items } | Self::Data { data: items } => {
                items
            }
        }
    }
}

/// Error bodies seen from the backend. The first populated field wins.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail.or(b.message).or(b.error))
        .unwrap_or_else(|| body.trim().to_string())
}

/// A path below the API root, held as raw segments. Each segment is
/// percent-encoded on its own when the URL is built, so an identifier can
/// never reach outside its own segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    pub fn new(base: &str) -> Self {
        Self {
            segments: vec![base.to_string()],
        }
    }

    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        f.write_str("/")
    }
}

/// Authenticated JSON client shared by every entity service. Cloning is cheap
/// and clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    log_requests: bool,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the given API root (e.g. `https://school.example/api`).
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        // Validate up front so a bad config fails at construction.
        Url::parse(base_url)?;
        let http = Client::builder()
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            log_requests: false,
        })
    }

    /// Log every outgoing request at info instead of debug.
    pub fn with_request_log(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path, always with a trailing slash.
    pub fn url(&self, path: &ApiPath, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                DashboardError::Config(format!("{} cannot be used as an API root", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in path.segments() {
                segments.push(segment);
            }
            segments.push("");
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn bearer(&self) -> Result<String> {
        match self.tokens.token() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(DashboardError::Authentication(
                "no session token available".to_string(),
            )),
        }
    }

    fn request(
        &self,
        method: Method,
        path: &ApiPath,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        // Token first: without one the request is never built.
        let token = self.bearer()?;
        let url = self.url(path, query)?;
        if self.log_requests {
            tracing::info!(target: "schooldesk::api", %method, %path, "sending request");
        } else {
            tracing::debug!(target: "schooldesk::api", %method, %path, "sending request");
        }
        Ok(self
            .http
            .request(method, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/json"))
    }

    async fn send(
        &self,
        method: &Method,
        path: &ApiPath,
        builder: RequestBuilder,
    ) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(target: "schooldesk::api", %method, %path, error = %e, "request failed");
            DashboardError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::warn!(
                target: "schooldesk::api",
                %method,
                %path,
                status = status.as_u16(),
                message = %message,
                "backend returned an error"
            );
            return Err(DashboardError::Request {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &ApiPath,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, path, query)?;
        let response = self.send(&Method::GET, path, builder).await?;
        Self::decode(response).await
    }

    /// GET a collection, unwrapping a `results`/`data` envelope if present.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &ApiPath,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let envelope: ListEnvelope<T> = self.get_json(path, query).await?;
        Ok(envelope.into_vec())
    }

    pub async fn post_json<B, T>(&self, path: &ApiPath, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path, &[])?.json(body);
        let response = self.send(&Method::POST, path, builder).await?;
        Self::decode(response).await
    }

    /// POST with no body, for action endpoints like `/publish/`.
    pub async fn post_action<T: DeserializeOwned>(&self, path: &ApiPath) -> Result<T> {
        let builder = self.request(Method::POST, path, &[])?;
        let response = self.send(&Method::POST, path, builder).await?;
        Self::decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &ApiPath, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path, &[])?.json(body);
        let response = self.send(&Method::PUT, path, builder).await?;
        Self::decode(response).await
    }

    /// DELETE; any 2xx counts as success and the body is ignored.
    pub async fn delete(&self, path: &ApiPath) -> Result<()> {
        let builder = self.request(Method::DELETE, path, &[])?;
        self.send(&Method::DELETE, path, builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session_service::StaticToken;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(StaticToken::new("t"))).unwrap()
    }

    #[test]
    fn url_joins_paths_and_query() {
        let api = client("https://school.example/api/");
        assert_eq!(
            api.url(&ApiPath::new("admissions"), &[]).unwrap().as_str(),
            "https://school.example/api/admissions/"
        );
        assert_eq!(
            api.url(&ApiPath::new("jobposts"), &[("status", "draft")])
                .unwrap()
                .as_str(),
            "https://school.example/api/jobposts/?status=draft"
        );
        assert_eq!(
            api.url(&ApiPath::new("bills").push("7").push("publish"), &[])
                .unwrap()
                .as_str(),
            "https://school.example/api/bills/7/publish/"
        );
    }

    #[test]
    fn url_keeps_segments_opaque() {
        let api = client("https://school.example");
        let path = ApiPath::new("booklists").push("../students/5?force=1#x");
        let url = api.url(&path, &[]).unwrap();
        assert_eq!(url.path(), "/booklists/..%2Fstudents%2F5%3Fforce=1%23x/");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert_eq!(path.to_string(), "/booklists/../students/5?force=1#x/");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = ApiClient::new("not a url", Arc::new(StaticToken::new("t"))).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn error_message_prefers_structured_fields() {
        assert_eq!(error_message(r#"{"detail": "Not found."}"#), "Not found.");
        assert_eq!(error_message(r#"{"message": "boom"}"#), "boom");
        assert_eq!(error_message("Internal Server Error\n"), "Internal Server Error");
    }

    #[test]
    fn envelopes_unwrap() {
        let bare: ListEnvelope<u32> = serde_json::from_str("[1,2]").unwrap();
        let results: ListEnvelope<u32> =
            serde_json::from_str(r#"{"count": 2, "results": [1,2]}"#).unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);
        assert_eq!(results.into_vec(), vec![1, 2]);
    }
}
