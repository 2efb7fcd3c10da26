//! Error types for the xiaoai-rpc crate.
//!
//! A call either returns the device's result or fails with one of a few
//! coarse kinds. Transport failures are deliberately not split by cause.

use crate::transport::TransportError;

/// Errors returned by `RpcClient` calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No well-formed response arrived in time
    #[error("RPC timeout")]
    Transport(#[from] TransportError),

    /// Device rejected the token (result code -5)
    #[error("Token error")]
    Auth,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl ClientError {
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

/// Errors raised while loading or validating a `Config`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = ClientError::Auth;
        assert_eq!(err.to_string(), "Token error");

        let err = ClientError::Transport(TransportError::MissingResult);
        assert_eq!(err.to_string(), "RPC timeout");

        let err = ClientError::UnsupportedOperation("reboot".to_string());
        assert_eq!(err.to_string(), "Unsupported operation: reboot");
    }

    #[test]
    fn test_transport_kind_hides_cause_in_display() {
        let causes = [
            TransportError::MissingResult,
            TransportError::MissingCode,
            TransportError::Json(serde_json::from_str::<i32>("x").unwrap_err()),
        ];

        for cause in causes {
            let err: ClientError = cause.into();
            assert!(err.is_transport());
            assert_eq!(err.to_string(), "RPC timeout");
        }
    }

    #[test]
    fn test_transport_keeps_source() {
        let err = ClientError::Transport(TransportError::MissingCode);
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Result has no integer code");
    }

    #[test]
    fn test_error_predicates() {
        assert!(ClientError::Auth.is_auth());
        assert!(!ClientError::Auth.is_transport());
        assert!(!ClientError::UnsupportedOperation("x".into()).is_auth());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("port must be non-zero".to_string());
        assert_eq!(err.to_string(), "Invalid config: port must be non-zero");

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_error() -> Result<()> {
            Err(ClientError::Auth)
        }
        assert!(matches!(returns_error(), Err(ClientError::Auth)));
    }
}
