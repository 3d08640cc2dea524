//! HTTP client for the Strongbox server.
//!
//! Every request body is JSON sealed with the shared key
//! (`nonce || AES-256-GCM`) and sent as `application/octet-stream`.
//! Response bodies are opened with the same key. A body that fails to open is
//! passed through as-is, since the server may answer errors in plaintext.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::service::SecretService;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strongbox_crypto::{CryptoKey, decrypt, encrypt};
use strongbox_types::{Credentials, SecretBundle, SecretRecord, SecretRef};
use tracing::{debug, warn};

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client for the Strongbox user API.
pub struct SecretApiClient {
    client: Client,
    api_root: String,
    key: CryptoKey,
}

impl SecretApiClient {
    pub fn new(config: &ClientConfig, key: CryptoKey) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            key,
        })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// Serializes and seals a request body.
    fn seal_body(&self, body: &impl Serialize) -> ClientResult<Vec<u8>> {
        let json = serde_json::to_vec(body)?;
        Ok(encrypt(&self.key, &json)?)
    }

    /// Opens a response body, falling back to the raw bytes.
    fn open_body(&self, raw: &[u8]) -> Vec<u8> {
        if raw.is_empty() {
            return Vec::new();
        }
        match decrypt(&self.key, raw) {
            Ok(plain) => plain,
            Err(e) => {
                debug!("response body not sealed with our key ({e}), using it as-is");
                raw.to_vec()
            }
        }
    }

    fn with_body(
        &self,
        builder: RequestBuilder,
        token: Option<&str>,
        body: &impl Serialize,
    ) -> ClientResult<RequestBuilder> {
        let builder = match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        Ok(builder
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(self.seal_body(body)?))
    }

    /// Sends a request and returns the opened body of a 2xx response.
    async fn execute(&self, request: RequestBuilder, path: &str) -> ClientResult<Vec<u8>> {
        let resp = request.send().await?;
        let status = resp.status();
        let raw = resp.bytes().await?;
        let body = self.open_body(&raw);

        if !status.is_success() {
            let err = server_error(status, &body);
            warn!("{path} failed: {err}");
            return Err(err);
        }
        Ok(body)
    }

    async fn post(&self, path: &str, token: Option<&str>, body: &impl Serialize) -> ClientResult<Vec<u8>> {
        let request = self.with_body(self.client.post(self.url(path)), token, body)?;
        self.execute(request, path).await
    }

    async fn delete(&self, path: &str, token: &str, body: &impl Serialize) -> ClientResult<Vec<u8>> {
        let request = self.with_body(self.client.delete(self.url(path)), Some(token), body)?;
        self.execute(request, path).await
    }

    async fn get(&self, path: &str, token: &str) -> ClientResult<Vec<u8>> {
        let request = self.client.get(self.url(path)).bearer_auth(token);
        self.execute(request, path).await
    }
}

#[async_trait]
impl SecretService for SecretApiClient {
    async fn register(&self, credentials: &Credentials) -> ClientResult<()> {
        self.post("/register", None, credentials).await?;
        debug!("registered account");
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<String> {
        let body = self.post("/login", None, credentials).await?;
        let resp: TokenResponse = serde_json::from_slice(&body)?;
        debug!("logged in");
        Ok(resp.token)
    }

    async fn get_all_secrets(&self, token: &str) -> ClientResult<SecretBundle> {
        let body = self.get("/secret/get-all-secrets", token).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn post_secret(&self, token: &str, record: &SecretRecord) -> ClientResult<()> {
        let path = format!("/secret/post-{}", record.kind().slug());
        self.post(&path, Some(token), record).await?;
        Ok(())
    }

    async fn delete_secret(&self, token: &str, secret: &SecretRef) -> ClientResult<()> {
        let path = format!("/secret/delete-{}", secret.kind.slug());
        let mut body = serde_json::Map::new();
        body.insert(
            secret.kind.key_field().to_string(),
            serde_json::Value::String(secret.key.clone()),
        );
        self.delete(&path, token, &body).await?;
        Ok(())
    }
}

/// Builds a server error from an opened body, preferring its `error` field.
fn server_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .map(|r| r.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    ClientError::Server {
        status: status.as_u16(),
        message,
    }
}
