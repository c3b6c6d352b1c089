//! The convenience client: a session pre-wired to a synchronized state.

use std::sync::{Arc, Mutex, PoisonError};

use mathrush_client::{ClientConfig, CloseReason, Session};
use mathrush_protocol::{PlayerId, Powerup};
use mathrush_state::GameState;

use crate::error::MathrushError;
use crate::sync::{attach, SharedState};

/// A connected quiz client: one [`Session`] plus the [`GameState`] the
/// synchronizer keeps in step with it.
///
/// This is the assembled product; components that only need part of it
/// take a [`Session`] clone or the [`SharedState`] handle instead.
pub struct QuizClient {
    session: Session,
    state: SharedState,
}

impl QuizClient {
    /// Connects and wires a fresh state to the session before the first
    /// frame is dispatched, so even the server's connect-time greeting is
    /// folded in.
    ///
    /// # Errors
    /// Returns [`ClientError::Connect`](mathrush_client::ClientError) via
    /// [`MathrushError::Client`] if the endpoint is unreachable.
    pub async fn connect(
        config: &ClientConfig,
        name: &str,
    ) -> Result<Self, MathrushError> {
        let state: SharedState = Arc::new(Mutex::new(GameState::new()));
        let sync_state = Arc::clone(&state);
        let session = Session::connect_with(config, name, move |session| {
            attach(session, sync_state);
        })
        .await?;
        Ok(Self { session, state })
    }

    /// The underlying session, for subscriptions and raw sends.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The shared state handle, for components that poll it directly.
    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// A point-in-time copy of the game state.
    pub fn snapshot(&self) -> GameState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Submits an answer to the current question.
    pub fn send_submit(&self, answer: i32) -> Result<(), MathrushError> {
        Ok(self.session.send_submit(answer)?)
    }

    /// Buys a powerup and applies it to the given player.
    pub fn send_purchase(
        &self,
        powerup: Powerup,
        target: PlayerId,
    ) -> Result<(), MathrushError> {
        Ok(self.session.send_purchase(powerup, target)?)
    }

    /// Asks the lobby to start without waiting for more players.
    pub fn send_skip_wait(&self) -> Result<(), MathrushError> {
        Ok(self.session.send_skip_wait()?)
    }

    /// Closes the session.
    pub fn close(&self) {
        self.session.close();
    }

    /// Waits until the session is closed and returns why.
    pub async fn wait_closed(&self) -> CloseReason {
        self.session.wait_closed().await
    }
}
