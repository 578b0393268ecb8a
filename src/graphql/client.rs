use crate::config::SyncConfig;
use crate::error::{GraphqlError, SyncError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Authenticated client for a single GraphQL endpoint
///
/// Every call is one request: no retry, no caching, no state carried between
/// invocations. The inner `reqwest::Client` is also used for the plain image
/// downloads done by the inliner.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: Url,
    authorization: HeaderValue,
}

impl GraphqlClient {
    /// Build a client from the session configuration
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            SyncError::Config(format!("invalid endpoint {:?}: {}", config.endpoint, e))
        })?;

        let mut authorization = HeaderValue::from_str(&config.api_key)
            .map_err(|_| SyncError::Config("API key contains invalid characters".to_string()))?;
        authorization.set_sensitive(true);

        let http = build_http_client(config.timeout())?;

        Ok(Self {
            http,
            endpoint,
            authorization,
        })
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Perform one request and decode the JSON response
    ///
    /// Only a 200 with a non-empty JSON body counts as success.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Value, GraphqlError> {
        ::log::debug!("{} {}", method, url);

        let response = self
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(GraphqlError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            ::log::debug!("GraphQL endpoint answered {}", status);
            return Err(GraphqlError::Http(status));
        }

        let bytes = response.bytes().await.map_err(GraphqlError::Network)?;
        if bytes.is_empty() {
            return Err(GraphqlError::EmptyResponse);
        }

        serde_json::from_slice(&bytes).map_err(GraphqlError::Json)
    }

    /// POST a GraphQL document with its variables to the configured endpoint
    pub async fn query(&self, document: &str, variables: Value) -> Result<Value, GraphqlError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = json!({
            "query": document,
            "variables": variables,
        });

        self.execute(
            Method::POST,
            self.endpoint.clone(),
            headers,
            body.to_string().into_bytes(),
        )
        .await
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SyncError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SyncError::Config(format!("cannot build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GraphqlClient {
        let mut config = SyncConfig::new("test-key", "/tmp/unused");
        config.endpoint = format!("{}/api/graphql", server.uri());
        config.timeout_secs = 5;
        GraphqlClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_query_sends_auth_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/graphql"))
            .and(header("authorization", "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({"variables": {"slug": "abc"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let value = client
            .query("query { ok }", json!({"slug": "abc"}))
            .await
            .unwrap();
        assert_eq!(value["data"]["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_non_200_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("{}"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .query("query { ok }", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "http_error");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .query("query { ok }", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphqlError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_garbage_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .query("query { ok }", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "json_error");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Bind and release a port so nothing listens on it
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let mut config = SyncConfig::new("test-key", "/tmp/unused");
        config.endpoint = format!("http://127.0.0.1:{}/api/graphql", port);
        config.timeout_secs = 5;

        let err = GraphqlClient::new(&config)
            .unwrap()
            .query("query { ok }", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network_error");
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let mut config = SyncConfig::new("k", "/tmp/unused");
        config.endpoint = "not a url".to_string();
        assert!(matches!(
            GraphqlClient::new(&config),
            Err(SyncError::Config(_))
        ));
    }
}
