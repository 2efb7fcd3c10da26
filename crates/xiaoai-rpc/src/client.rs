//! RPC client for talking to a XiaoAi speaker hook.
//!
//! Builds request envelopes, injects the token, posts them over the shared
//! HTTP session and classifies the device's answer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::protocol::{DeviceResult, Params, Request, Response, TOKEN_ERROR, TOKEN_PARAM};
use crate::transport::{HttpTransport, TransportError};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Port the hook service listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 18888;

/// JSON-RPC client bound to one device.
///
/// Safe to share between tasks: ids come from an atomic counter and the
/// underlying HTTP session supports concurrent requests.
#[derive(Debug)]
pub struct RpcClient {
    transport: HttpTransport,
    token: Option<Secret<String>>,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for `http://{host}:{port}/` without a token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP session cannot be created.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(host, port)?,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            next_id: AtomicU64::new(1),
        })
    }

    /// Create a client from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the HTTP session cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(&config.host, config.port)?.with_timeout(config.timeout());
        if let Some(token) = &config.token {
            client = client.with_token(token.expose_secret().as_str());
        }
        Ok(client)
    }

    /// Attach a token sent with every request. An empty token is ignored.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then(|| Secret::new(token));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Build the envelope for `method`, consuming the next request id.
    pub(crate) fn build_request(&self, method: &str, mut params: Params) -> Request {
        if let Some(token) = &self.token {
            params.insert(
                TOKEN_PARAM.to_string(),
                Value::String(token.expose_secret().clone()),
            );
        }
        Request::new(method, params, self.next_id())
    }

    /// Call a wire method with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` when no well-formed response arrives
    /// and `ClientError::Auth` when the device reports a token error.
    pub async fn call(&self, method: &str, params: Params) -> Result<DeviceResult> {
        self.call_with_timeout(method, params, self.timeout).await
    }

    /// Call a wire method with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` when no well-formed response arrives
    /// and `ClientError::Auth` when the device reports a token error.
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: Params,
        timeout: Duration,
    ) -> Result<DeviceResult> {
        let request = self.build_request(method, params);
        let id = request.id;
        debug!(method, id, "Sending RPC request to {}", self.base_url());

        let outcome = match self.transport.post(&request, timeout).await {
            Ok(response) => classify(response, id),
            Err(e) => Err(e.into()),
        };

        match &outcome {
            Ok(result) => debug!(method, id, code = result.code(), "RPC call completed"),
            Err(ClientError::Transport(cause)) => {
                warn!(method, id, timeout = cause.is_timeout(), "RPC call failed: {cause}");
            }
            Err(e) => warn!(method, id, "RPC call rejected: {e}"),
        }

        outcome
    }
}

/// Turn a response envelope into the call outcome.
/// Whether a response id refers to request `id`.
///
/// Integers, whole floats (`1.0`) and decimal strings (`"1"`) all match.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn id_matches(actual: &Value, id: u64) -> bool {
    match actual {
        Value::Number(n) => n.as_u64() == Some(id) || n.as_f64() == Some(id as f64),
        Value::String(s) => s.parse::<u64>().ok() == Some(id),
        _ => false,
    }
}

fn classify(response: Response, id: u64) -> Result<DeviceResult> {
    if let Some(actual) = response.id
        && !id_matches(&actual, id)
    {
        return Err(TransportError::IdMismatch {
            expected: id,
            actual,
        }
        .into());
    }

    let result = response
        .result
        .filter(Value::is_object)
        .ok_or(TransportError::MissingResult)?;
    let result = DeviceResult::from_value(result).ok_or(TransportError::MissingCode)?;

    if result.code() == TOKEN_ERROR {
        return Err(ClientError::Auth);
    }

    Ok(result)
}
