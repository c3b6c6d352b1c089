//! Client-side game state for Mathrush.
//!
//! One mutable record ([`GameState`]) holds everything the UI renders:
//! the roster, self score and coins, active effects, multipliers, the
//! current question, and which logical screen is shown. [`apply`] folds a
//! decoded [`ServerEvent`](mathrush_protocol::ServerEvent) into that
//! record.
//!
//! The reducer is pure mutation over plain data — no sockets, no async —
//! which keeps every state-transition rule unit-testable without a
//! connection. Wiring it to a live session happens one layer up, in the
//! `mathrush` meta-crate.

mod reduce;
mod state;

pub use reduce::apply;
pub use state::{GameState, Player, Question, Screen};
