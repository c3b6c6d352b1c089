//! # Mathrush
//!
//! Client core for the Mathrush real-time multiplayer quiz game: a binary
//! wire codec, a stateful WebSocket session, and a synchronizer that keeps
//! one shared [`GameState`](mathrush_state::GameState) consistent with the
//! server's event stream. Rendering is someone else's job — a UI reads
//! snapshots and calls the senders.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mathrush::prelude::*;
//!
//! # async fn run() -> Result<(), MathrushError> {
//! let config = ClientConfig::default();
//! let client = QuizClient::connect(&config, "Ada").await?;
//!
//! client.session().on_event(EventKind::NewQuestion, |event| {
//!     if let ServerEvent::NewQuestion { question, .. } = event {
//!         println!("new question: {question}");
//!     }
//! });
//!
//! client.send_submit(42)?;
//! let reason = client.wait_closed().await;
//! println!("game over: {reason}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod sync;

pub use client::QuizClient;
pub use error::MathrushError;

// The layered crates remain importable on their own; these re-exports are
// for users of the meta-crate.
pub use mathrush_client::{ClientConfig, ClientError, CloseReason, Session};
pub use mathrush_protocol::{
    ClientCommand, EffectId, EventKind, PlayerId, PlayerRecord, Powerup,
    ProtocolError, ServerEvent,
};
pub use mathrush_state::{apply, GameState, Player, Question, Screen};

/// One-stop imports for client code.
pub mod prelude {
    pub use crate::sync::{attach, SharedState};
    pub use crate::{
        ClientCommand, ClientConfig, ClientError, CloseReason, EffectId,
        EventKind, GameState, MathrushError, Player, PlayerId,
        PlayerRecord, Powerup, ProtocolError, Question, QuizClient, Screen,
        ServerEvent, Session,
    };
}
