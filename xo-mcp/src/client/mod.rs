// Xen Orchestra REST client
//
// This module wraps the single HTTP round trip every tool performs. A fresh
// reqwest client is built for each call so its connection is released on
// every exit path, including timeouts and dropped futures.

use std::sync::Arc;

use log::debug;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Certificate, Client, Method};
use serde_json::Value;

use crate::config::{ServerConfig, TlsVerify};
use crate::errors::ToolError;

/// Path prefix of the REST API surface used by every resource family
pub const REST_PREFIX: &str = "rest/v0";

/// Name of the cookie carrying the API token
pub const AUTH_COOKIE: &str = "authenticationToken";

/// Whether a request needs the API token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Fail with a configuration error when no token is configured
    Required,
    /// Send the token when there is one
    Optional,
}

/// Successful (2xx) reply from the REST API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    /// Parsed JSON body, `None` for an empty body
    pub body: Option<Value>,
}

/// Client for the Xen Orchestra REST API
#[derive(Debug, Clone)]
pub struct XoClient {
    config: Arc<ServerConfig>,
}

impl XoClient {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Absolute URL of a path below the REST prefix
    pub fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url(),
            REST_PREFIX,
            path.trim_start_matches('/')
        )
    }

    pub async fn get(&self, path: &str, auth: Auth) -> Result<ApiReply, ToolError> {
        self.send(Method::GET, path, None, auth).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiReply, ToolError> {
        self.send(Method::POST, path, Some(body), Auth::Required).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<ApiReply, ToolError> {
        self.send(Method::PATCH, path, Some(body), Auth::Required).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiReply, ToolError> {
        self.send(Method::DELETE, path, None, Auth::Required).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        auth: Auth,
    ) -> Result<ApiReply, ToolError> {
        // Checked before anything touches the network
        let token = self.token(auth)?;
        let client = self.http_client()?;

        let url = self.rest_url(path);
        debug!("Request URL: {} {}", method, url);

        let mut request = client
            .request(method, &url)
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.header(COOKIE, format!("{}={}", AUTH_COOKIE, token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {} for {}", status, url);
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ToolError::Http {
                status: status.as_u16(),
                body: truncate_body(&text, crate::defaults::ERROR_BODY_MAX_BYTES),
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            let value = serde_json::from_str(&text).map_err(|e| {
                ToolError::transport(format!("malformed JSON in response from {}: {}", url, e))
            })?;
            Some(value)
        };

        Ok(ApiReply {
            status: status.as_u16(),
            body,
        })
    }

    fn token(&self, auth: Auth) -> Result<Option<&str>, ToolError> {
        match (self.config.credential(), auth) {
            (Some(token), _) => Ok(Some(token)),
            (None, Auth::Optional) => Ok(None),
            (None, Auth::Required) => Err(ToolError::Configuration(format!(
                "{} is not set; cannot authenticate against {}",
                crate::config::ENV_API_TOKEN,
                self.config.base_url()
            ))),
        }
    }

    fn http_client(&self) -> Result<Client, ToolError> {
        let mut builder = Client::builder().timeout(self.config.request_timeout());

        match self.config.tls_verify() {
            TlsVerify::Enabled => {}
            TlsVerify::Disabled => {
                builder = builder.danger_accept_invalid_certs(true);
            }
            TlsVerify::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    ToolError::transport(format!(
                        "failed to read CA bundle {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let certificate = Certificate::from_pem(&pem).map_err(|e| {
                    ToolError::transport(format!("invalid CA bundle {}: {}", path.display(), e))
                })?;
                builder = builder.add_root_certificate(certificate);
            }
        }

        builder
            .build()
            .map_err(|e| ToolError::transport(format!("Failed to build HTTP client: {}", e)))
    }
}

/// Cut an error body down to at most `max` bytes without splitting a character
pub fn truncate_body(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn client_for(base_url: &str) -> XoClient {
        XoClient::new(Arc::new(ServerConfig::default().with_base_url(base_url)))
    }

    #[test]
    fn test_rest_url_single_separator() {
        let client = client_for("https://xo.lan/");
        assert_eq!(client.rest_url("vms"), "https://xo.lan/rest/v0/vms");
        assert_eq!(client.rest_url("/vms/abc"), "https://xo.lan/rest/v0/vms/abc");
    }

    #[test]
    fn test_truncate_body_keeps_short_text() {
        assert_eq!(truncate_body("not found", 2048), "not found");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let text = "é".repeat(10);
        let cut = truncate_body(&text, 5);
        assert!(cut.starts_with("éé"));
        assert!(cut.ends_with("(truncated)"));
    }

    fn tls_client(base_url: &str, tls_verify: TlsVerify) -> XoClient {
        let config = ServerConfig::default()
            .with_base_url(base_url)
            .with_credential("tok")
            .with_tls_verify(tls_verify);
        XoClient::new(Arc::new(config))
    }

    #[tokio::test]
    async fn test_unusable_ca_bundle_fails_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v0/docs/swagger.json")
            .expect(0)
            .create_async()
            .await;

        let not_pem = std::env::temp_dir()
            .join(format!("xo-mcp-{}.pem", uuid::Uuid::new_v4()));
        std::fs::write(&not_pem, b"this is not a certificate").unwrap();

        for bundle in [PathBuf::from("/nonexistent/xo-ca.pem"), not_pem.clone()] {
            let client = tls_client(&server.url(), TlsVerify::CaBundle(bundle.clone()));
            let err = client
                .get("docs/swagger.json", Auth::Optional)
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::Transport(_)), "{:?} gave {:?}", bundle, err);
            assert_eq!(
                crate::tools::ToolResponse::from_error(&err).kind(),
                Some(crate::tools::FailureKind::Exception)
            );
        }

        std::fs::remove_file(&not_pem).ok();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_disabled_verification_still_sends_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v0/vms/abc")
            .match_header("cookie", "authenticationToken=tok")
            .with_status(200)
            .with_body(r#"{"uuid": "abc"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = tls_client(&server.url(), TlsVerify::Disabled);
        let reply = client.get("vms/abc", Auth::Required).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, Some(serde_json::json!({"uuid": "abc"})));
    }

    #[tokio::test]
    async fn test_missing_token_is_configuration_error() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.delete("vms/abc").await.unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
    }
}
