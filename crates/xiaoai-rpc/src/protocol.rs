//! JSON-RPC 2.0 envelope types.
//!
//! The speaker speaks a reduced dialect of JSON-RPC 2.0: requests always carry
//! an object of named params and a numeric id, and every response wraps its
//! payload in a `result` object whose `code` field signals success or failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Result code reporting success.
pub const SUCCESS: i64 = 0;

/// Result code reporting a missing or rejected token.
pub const TOKEN_ERROR: i64 = -5;

/// Parameter key the token is injected under.
pub const TOKEN_PARAM: &str = "token";

/// Named request parameters.
pub type Params = Map<String, Value>;

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub params: Params,
    pub jsonrpc: String,
    pub id: u64,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, params: Params, id: u64) -> Self {
        Self {
            method: method.into(),
            params,
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
        }
    }
}

/// JSON-RPC 2.0 Response as returned by the device.
///
/// Only `result` is required. The device usually omits `jsonrpc` and `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Response {
    #[must_use]
    pub fn success(result: Value) -> Self {
        Self {
            jsonrpc: None,
            result: Some(result),
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(Value::from(id));
        self
    }
}

/// Payload of a completed call.
///
/// Always holds an object with an integer `code`; every other field is kept
/// exactly as the device sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceResult(Map<String, Value>);

impl DeviceResult {
    /// Wrap a `result` object, returning `None` unless it carries an integer `code`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        map.get("code").and_then(Value::as_i64)?;
        Some(Self(map))
    }

    #[must_use]
    pub fn code(&self) -> i64 {
        self.0.get("code").and_then(Value::as_i64).unwrap_or_default()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code() == SUCCESS
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<DeviceResult> for Value {
    fn from(result: DeviceResult) -> Self {
        Value::Object(result.0)
    }
}
