//! Error types for the protocol layer.

/// Errors produced while encoding commands or decoding event frames.
///
/// Encoding errors concern only the frame being built and leave the
/// connection usable. Decoding errors mean the byte stream can no longer
/// be trusted — the framing cannot be resynchronized after a bad frame, so
/// the session treats them as connection-fatal.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A `Register` name is longer than the one-byte length prefix allows.
    #[error("player name is {len} bytes, the wire limit is 255")]
    NameTooLong { len: usize },

    /// The leading byte matches no known server event.
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    /// The frame ended before the payload its opcode demands.
    #[error("frame truncated at offset {offset}: {needed} more byte(s) required")]
    Truncated { offset: usize, needed: usize },

    /// A length-prefixed text field is not valid UTF-8.
    #[error("text field is not valid UTF-8")]
    InvalidText(#[source] std::str::Utf8Error),
}
