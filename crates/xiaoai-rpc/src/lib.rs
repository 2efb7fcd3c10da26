//! JSON-RPC 2.0 over HTTP client for XiaoAi speaker hooks.
//!
//! The hook service running on the speaker accepts JSON-RPC envelopes posted
//! to `http://{host}:{port}/` and answers with a `result` object carrying an
//! integer `code`. This crate sends those calls and reduces every outcome to
//! a result or one of two failures: the device could not be reached in time
//! (`ClientError::Transport`) or it rejected the token (`ClientError::Auth`).
//!
//! # Architecture
//!
//! - [`protocol`]: Request/response envelopes and result codes
//! - [`transport`]: Reusable HTTP session posting envelopes
//! - [`client`]: Request ids, token injection and response classification
//! - [`methods`]: Logical operations (status, speak, control, volume)
//! - [`config`]: JSON device configuration
//! - [`error`]: Error types and `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use xiaoai_rpc::RpcClient;
//!
//! # async fn example() -> Result<(), xiaoai_rpc::ClientError> {
//! let client = RpcClient::new("192.168.1.20", 18888)?.with_token("abc");
//!
//! let status = client.status().await?;
//! println!("device answered with code {}", status.code());
//!
//! client.speak_text("hello").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod methods;
pub mod protocol;
pub mod transport;

pub use client::{DEFAULT_PORT, DEFAULT_TIMEOUT, RpcClient};
pub use config::Config;
pub use error::{ClientError, ConfigError, Result};
pub use methods::{
    MAX_VOLUME, Operation, PlaybackCommand, VolumeChange, control_params, speak_params,
    volume_params,
};
pub use protocol::{
    DeviceResult, JSONRPC_VERSION, Params, Request, Response, SUCCESS, TOKEN_ERROR, TOKEN_PARAM,
};
pub use transport::{HttpTransport, TransportError};
