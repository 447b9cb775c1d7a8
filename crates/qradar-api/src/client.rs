// QRadar API client
//
// Binds a `Transport` to request building and JSON decoding. Endpoint
// families (offenses, source addresses) live in their own files as
// inherent methods so this module stays focused on the round trip.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::request::{RequestSpec, build_request};
use crate::transport::{ClientConfig, HttpTransport, Transport};

/// Typed client for the QRadar SIEM API.
///
/// Holds nothing but its transport, so one instance can serve any number
/// of concurrent callers. Every method is exactly one request/response
/// cycle: no retries, caching, or batching.
#[derive(Debug, Clone)]
pub struct QRadarClient<T = HttpTransport> {
    transport: T,
}

impl QRadarClient<HttpTransport> {
    /// Build a client over reqwest from a console configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> QRadarClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build, send, and decode one request.
    ///
    /// A decode failure discards the whole body; no partial result is
    /// returned for collections.
    pub(crate) async fn send<R: DeserializeOwned>(&self, spec: RequestSpec<'_>) -> Result<R, Error> {
        let request = build_request(self.transport.base_url(), spec)?;
        debug!(method = %request.method, path = request.url.path(), "qradar call");

        let body = self.transport.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
