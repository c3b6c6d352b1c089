//! Unified error type for the meta-crate.

use mathrush_client::ClientError;
use mathrush_protocol::ProtocolError;

/// Top-level error that wraps the crate-specific errors.
///
/// Users of the `mathrush` meta-crate deal with this single type; the
/// `#[from]` conversions let `?` lift sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MathrushError {
    /// An encode/decode error from the protocol layer.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A connection or send error from the session layer.
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::UnknownOpcode(99);
        let top: MathrushError = err.into();
        assert!(matches!(top, MathrushError::Protocol(_)));
        assert!(top.to_string().contains("99"));
    }

    #[test]
    fn test_from_client_error() {
        let err = ClientError::Closed;
        let top: MathrushError = err.into();
        assert!(matches!(top, MathrushError::Client(_)));
        assert_eq!(top.to_string(), "session closed");
    }
}
