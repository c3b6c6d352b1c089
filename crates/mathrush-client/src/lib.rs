//! WebSocket session layer for Mathrush clients.
//!
//! A [`Session`] owns exactly one live connection to the game server and
//! turns its raw byte stream into typed, multiplexed events:
//!
//! 1. **Connect** — [`Session::connect`] opens the socket, sending the
//!    display name as a query parameter.
//! 2. **Subscribe** — [`Session::on_event`] registers any number of
//!    listeners per event kind; every inbound frame is decoded once and
//!    fanned out to the listeners of its kind, in registration order.
//! 3. **Send** — typed senders ([`Session::send_submit`],
//!    [`Session::send_purchase`], …) encode and transmit immediately,
//!    fire-and-forget.
//!
//! The session is a cheap-to-clone handle: clone it into every component
//! that needs to send or subscribe instead of stashing a socket in a
//! global. Whoever constructed it owns the lifecycle
//! (open → active → closed).

mod config;
mod error;
mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{CloseReason, Session};
