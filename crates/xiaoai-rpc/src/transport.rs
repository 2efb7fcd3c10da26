//! HTTP transport for JSON-RPC envelopes.
//!
//! Every request is a single `POST` of the JSON envelope to the device's base
//! URL. One `reqwest::Client` is kept for the lifetime of the transport so
//! connections are reused between calls.
//!
//! ```text
//! POST http://{host}:{port}/
//! Content-Type: application/json
//!
//! {"method": "...", "params": {...}, "jsonrpc": "2.0", "id": N}
//! ```

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::protocol::{Request, Response};

/// Single reusable HTTP session bound to one device endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `http://{host}:{port}/`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the HTTP client cannot be initialized.
    pub fn new(host: &str, port: u16) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url(host, port),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post one envelope and parse the response body.
    ///
    /// The HTTP status is not inspected; only the body decides the outcome.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` on connection failure or timeout and
    /// `TransportError::Json` when the body is not a JSON response envelope.
    pub async fn post(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response, TransportError> {
        let body = serde_json::to_vec(request)?;

        let response = self
            .client
            .post(&self.base_url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .body(body)
            .send()
            .await?;

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn base_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{host}]:{port}/")
    } else {
        format!("http://{host}:{port}/")
    }
}

/// Root causes of a failed round trip.
///
/// Callers only ever see these wrapped in `ClientError::Transport`; they are
/// kept for logging.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response has no result object")]
    MissingResult,

    #[error("Result has no integer code")]
    MissingCode,

    #[error("Response id {actual} does not match request id {expected}")]
    IdMismatch { expected: u64, actual: Value },
}

impl TransportError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Params;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn server_port(server: &MockServer) -> u16 {
        server.address().port()
    }

    #[test]
    fn test_base_url() {
        assert_eq!(base_url("192.168.1.20", 18888), "http://192.168.1.20:18888/");
        assert_eq!(base_url("speaker.local", 80), "http://speaker.local:80/");
    }

    #[test]
    fn test_base_url_ipv6() {
        assert_eq!(base_url("::1", 18888), "http://[::1]:18888/");
        assert_eq!(base_url("[::1]", 18888), "http://[::1]:18888/");
    }

    #[test]
    fn test_transport_base_url() {
        let transport = HttpTransport::new("10.0.0.5", 18888).unwrap();
        assert_eq!(transport.base_url(), "http://10.0.0.5:18888/");
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(
            TransportError::MissingResult.to_string(),
            "Response has no result object"
        );
        assert_eq!(
            TransportError::MissingCode.to_string(),
            "Result has no integer code"
        );

        let err = TransportError::IdMismatch {
            expected: 4,
            actual: json!(9),
        };
        assert_eq!(
            err.to_string(),
            "Response id 9 does not match request id 4"
        );
    }

    #[test]
    fn test_transport_error_from_json() {
        let json_err = serde_json::from_str::<Value>("not json").unwrap_err();
        let err: TransportError = json_err.into();
        assert!(matches!(err, TransportError::Json(_)));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_post_sends_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "method": "STATUS",
                "params": {},
                "jsonrpc": "2.0",
                "id": 1
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": {"code": 0}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new("127.0.0.1", server_port(&server)).unwrap();
        let request = Request::new("STATUS", Params::new(), 1);
        let response = transport
            .post(&request, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(response.result, Some(json!({"code": 0})));
    }

    #[tokio::test]
    async fn test_post_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new("127.0.0.1", server_port(&server)).unwrap();
        let request = Request::new("STATUS", Params::new(), 1);
        let err = transport
            .post(&request, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Json(_)));
    }

    #[tokio::test]
    async fn test_post_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": {"code": 0}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new("127.0.0.1", server_port(&server)).unwrap();
        let request = Request::new("STATUS", Params::new(), 1);
        let err = transport
            .post(&request, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }
}
