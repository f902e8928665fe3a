//! API client for the Fleetwatch backend
//!
//! Single JSON request primitive used by the endpoint resolver and the typed
//! fleet operations. Handles base-URL resolution, bearer-token attachment,
//! JSON decoding, and mapping of response statuses onto the error taxonomy.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::errors::ApiError;
use super::session::AccessTokenProvider;
use crate::http::HttpClient;

/// Environment variable naming the backend base URL.
pub const ENV_API_URL: &str = "FLEETWATCH_API_URL";
/// Legacy alias still honored by older deployments.
pub const ENV_API_URL_LEGACY: &str = "FLEETWATCH_API";

const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Configuration for API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the backend (e.g., "https://fleet.example.com/api")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: Duration::from_secs(30) }
    }
}

impl ApiClientConfig {
    /// Resolve the base URL from the environment, preferring
    /// [`ENV_API_URL`] over the legacy [`ENV_API_URL_LEGACY`] alias and
    /// falling back to the development backend when neither is set.
    pub fn from_env() -> Self {
        let base_url = env::var(ENV_API_URL)
            .or_else(|_| env::var(ENV_API_URL_LEGACY))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self { base_url, ..Self::default() }
    }
}

/// JSON API client with explicit session handling
pub struct ApiClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self { http, auth, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issue one JSON request against one concrete path.
    ///
    /// Attaches the bearer token when the session holds one, decodes the
    /// response body as JSON (an empty or non-JSON body becomes `null`), and
    /// maps non-success statuses onto the error taxonomy. A 401 clears the
    /// session before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] for any non-success status or
    /// transport failure.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);

        debug!(%method, url = %url, "API request");

        let mut request = self
            .http
            .request(method, &url)
            .header("Content-Type", "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(token) = self.auth.access_token().await? {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(payload);
        }

        if status == StatusCode::UNAUTHORIZED {
            // Auth failure ends the session.
            self.auth.invalidate();
        }

        Err(Self::map_status_error(status, path, &payload))
    }

    fn map_status_error(status: StatusCode, path: &str, payload: &Value) -> ApiError {
        let message = envelope_message(payload)
            .unwrap_or_else(|| format!("{} returned status {}", path, status));

        if status == StatusCode::BAD_REQUEST {
            ApiError::Validation(message)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiError::Auth(message)
        } else if status == StatusCode::NOT_FOUND {
            ApiError::RouteNotFound { path: path.to_string() }
        } else if status.is_server_error() {
            warn!(%status, path, detail = %message, "backend failure");
            ApiError::Backend(message)
        } else {
            ApiError::Unexpected { status: status.as_u16(), message }
        }
    }
}

/// Extract the backend's error/message envelope text, when present.
fn envelope_message(payload: &Value) -> Option<String> {
    for key in ["error", "message"] {
        if let Some(text) = payload.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the session/token provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if required fields are missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Session provider not set".to_string()))?;

        ApiClient::new(config, auth)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::session::Session;
    use super::*;

    #[derive(Clone)]
    struct StaticTokenProvider {
        token: String,
    }

    #[async_trait]
    impl AccessTokenProvider for StaticTokenProvider {
        async fn access_token(&self) -> Result<Option<String>, ApiError> {
            Ok(Some(self.token.clone()))
        }
    }

    fn client_for(server: &MockServer) -> ApiClient {
        let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
        let auth = Arc::new(StaticTokenProvider { token: "test-token".to_string() });
        ApiClient::new(config, auth).unwrap()
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_decodes_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/devices"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let value = client.send(Method::GET, "/devices", &[], None).await.unwrap();
        assert_eq!(value, serde_json::json!({"items": []}));
    }

    #[tokio::test]
    async fn forwards_query_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/trips"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let query = vec![("limit".to_string(), "50".to_string())];
        let value = client.send(Method::GET, "/trips", &query, None).await.unwrap();
        assert_eq!(value, serde_json::json!([]));
    }

    #[tokio::test]
    async fn empty_body_decodes_as_null() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let value = client.send(Method::GET, "/ping", &[], None).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn maps_status_codes_onto_taxonomy() {
        let server = MockServer::start().await;

        for (route, status) in
            [("/bad", 400), ("/forbidden", 403), ("/missing", 404), ("/broken", 500), ("/odd", 405)]
        {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let client = client_for(&server);

        let err = client.send(Method::GET, "/bad", &[], None).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = client.send(Method::GET, "/forbidden", &[], None).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));

        let err = client.send(Method::GET, "/missing", &[], None).await.unwrap_err();
        assert!(matches!(err, ApiError::RouteNotFound { ref path } if path == "/missing"));

        let err = client.send(Method::GET, "/broken", &[], None).await.unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));

        let err = client.send(Method::GET, "/odd", &[], None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unexpected { status: 405, .. }));
    }

    #[tokio::test]
    async fn prefers_backend_error_envelope_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reports"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "adminStatus is required"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.send(Method::GET, "/reports", &[], None).await.unwrap_err();
        match err {
            ApiError::Validation(message) => assert_eq!(message, "adminStatus is required"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unauthorized_clears_session() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin/iot/devices"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let session = Arc::new(Session::new());
        session.establish(
            "stale-token".to_string(),
            fleetwatch_domain::SessionUser {
                id: None,
                email: "ops@example.com".to_string(),
                role: fleetwatch_domain::Role::Admin,
            },
        );

        let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
        let client = ApiClient::new(config, session.clone()).unwrap();

        let err = client.send(Method::GET, "/admin/iot/devices", &[], None).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn builder_requires_session_provider() {
        let result = ApiClient::builder().build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn config_from_env_prefers_primary_variable() {
        std::env::set_var(ENV_API_URL, "https://fleet.example.com");
        std::env::set_var(ENV_API_URL_LEGACY, "https://legacy.example.com");

        let config = ApiClientConfig::from_env();
        assert_eq!(config.base_url, "https://fleet.example.com");

        std::env::remove_var(ENV_API_URL);
        let config = ApiClientConfig::from_env();
        assert_eq!(config.base_url, "https://legacy.example.com");

        std::env::remove_var(ENV_API_URL_LEGACY);
        let config = ApiClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
