//! RPC HTTP client implementation.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use ledgerpage_core::error::{Error, ProtocolError, TransportError};
use ledgerpage_core::{Result, ServiceUrl};

use crate::endpoints::ErrorResponse;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for RPC requests.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    service: ServiceUrl,
}

impl RpcClient {
    /// Create a new RPC client for the given service.
    pub fn new(service: ServiceUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ledgerpage/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self { client, service })
    }

    /// Returns the service URL this client is configured for.
    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    /// Make an RPC query (GET request).
    #[instrument(skip(self, params), fields(service = %self.service))]
    pub async fn query<Q, R>(&self, method: &str, params: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.service.rpc_url(method);
        debug!(method, "RPC query");
        trace!(?params, "query parameters");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(map_reqwest)?;

        self.handle_response(method, response).await
    }

    /// Handle an RPC response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        method: &str,
        response: reqwest::Response,
    ) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "RPC response");

        if !status.is_success() {
            let error = self.parse_error_response(response).await;
            return Err(Error::Protocol(error));
        }

        let body = response.bytes().await.map_err(map_reqwest)?;
        serde_json::from_slice(&body).map_err(|e| Error::MalformedPage {
            reason: format!("{}: {}", method, e),
        })
    }

    /// Parse an RPC error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.error, body.message),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}

/// Classify a reqwest failure.
pub(crate) fn map_reqwest(err: reqwest::Error) -> Error {
    let error = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    error.into()
}
