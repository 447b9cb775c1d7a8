// Transport layer.
//
// `Transport` is the one seam between request building and the network:
// it takes a built `ApiRequest` and returns the raw success body. The
// reqwest-backed `HttpTransport` covers real consoles; tests plug in
// their own implementations.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RANGE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::request::ApiRequest;

/// Executes one HTTP round trip.
///
/// Implementations must return an error for any non-success status and
/// must not retry. Dropping the returned future cancels the call.
pub trait Transport: Send + Sync {
    /// Base URL requests are resolved against. Always ends with `/`.
    fn base_url(&self) -> &Url;

    /// Send `request` and return the response body on success.
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<String, Error>> + Send;
}

// ── Configuration ────────────────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (consoles ship with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport settings for building a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    pub fn build_client_with_headers(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("qradar-rs/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Everything needed to talk to one QRadar console.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Console root, e.g. `https://qradar.example.com`.
    pub console: Url,
    /// Authorized service token, sent as the `SEC` header.
    pub token: Option<SecretString>,
    /// Value for the `Version` header, e.g. `"20.0"`. Server default when unset.
    pub api_version: Option<String>,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(console: Url) -> Self {
        Self {
            console,
            token: None,
            api_version: None,
            transport: TransportConfig::default(),
        }
    }
}

// ── QRadar error document ────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

// ── HttpTransport ────────────────────────────────────────────────────

/// reqwest-backed transport for a QRadar console.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build from a [`ClientConfig`], injecting `SEC`, `Version` and
    /// `Accept` as default headers.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(token.expose_secret())
                .map_err(|_| Error::InvalidHeader { name: "SEC" })?;
            value.set_sensitive(true);
            headers.insert("sec", value);
        }
        if let Some(version) = &config.api_version {
            let value = HeaderValue::from_str(version)
                .map_err(|_| Error::InvalidHeader { name: "Version" })?;
            headers.insert("version", value);
        }

        let http = config.transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(config.console.clone()),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(Url::parse(base_url)?),
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) => Error::Api {
                status: status.as_u16(),
                code: err.code,
                message: err
                    .message
                    .or(err.description)
                    .unwrap_or_else(|| status.to_string()),
            },
            Err(_) => Error::Api {
                status: status.as_u16(),
                code: None,
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            },
        }
    }
}

/// Ensure the path ends with `/` so relative joins append instead of replace.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl Transport for HttpTransport {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn execute(&self, request: ApiRequest) -> Result<String, Error> {
        debug!(method = %request.method, url = %request.url, range = ?request.range, "sending request");

        let mut builder = self.http.request(request.method, request.url);
        if let Some(range) = request.range {
            builder = builder.header(RANGE, range);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body)
    }
}
