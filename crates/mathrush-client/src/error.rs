//! Error types for the session layer.

use mathrush_protocol::ProtocolError;

/// Errors that can occur on a client session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The endpoint was unreachable or rejected the WebSocket handshake.
    #[error("connect failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    /// The session is closed; the command was not sent.
    #[error("session closed")]
    Closed,

    /// Encoding the outgoing command failed; the connection is unaffected.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
