//! Wire protocol for Mathrush.
//!
//! This crate defines the "language" spoken between a quiz client and the
//! game server:
//!
//! - **Types** ([`ClientCommand`], [`ServerEvent`], [`PlayerId`], etc.) —
//!   the messages that travel on the wire.
//! - **Codec** ([`encode_command`], [`decode_event`]) — how those messages
//!   are converted to and from byte frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer is pure: no sockets, no state, no async. It sits
//! between the transport (raw frames) and the session (dispatch):
//!
//! ```text
//! Transport (bytes) → Protocol (ServerEvent) → Session (listener fan-out)
//! ```
//!
//! # Wire format
//!
//! Every frame starts with a one-byte opcode. Multi-byte integers are
//! big-endian, floats are 4-byte IEEE-754 big-endian, and text fields are
//! length-prefixed UTF-8 (never null-terminated). The transport delivers
//! frame boundaries, so there is no outer length prefix.

mod codec;
mod error;
mod types;

pub use codec::{decode_event, encode_command, MAX_NAME_BYTES};
pub use error::ProtocolError;
pub use types::{
    ClientCommand, EffectId, EventKind, PlayerId, PlayerRecord, Powerup,
    ServerEvent,
};
