//! The state synchronizer: session listeners that keep a shared
//! [`GameState`] consistent with the server's event stream.

use std::sync::{Arc, Mutex, PoisonError};

use mathrush_client::Session;
use mathrush_protocol::EventKind;
use mathrush_state::{apply, GameState};

/// Shared handle to the synchronizer's state record.
///
/// The synchronizer owns the authoritative copy; everyone else clones the
/// `Arc` and takes snapshots.
pub type SharedState = Arc<Mutex<GameState>>;

/// Registers one listener per event kind, each folding matching events
/// into `state` through [`apply`].
///
/// The session dispatches one frame at a time, so the reducer never races
/// itself; the mutex only orders state reads (UI snapshots) against
/// in-flight updates. To guarantee the server's connect-time greeting is
/// folded in too, call this inside
/// [`Session::connect_with`](mathrush_client::Session::connect_with).
pub fn attach(session: &Session, state: SharedState) {
    for kind in EventKind::ALL {
        let state = Arc::clone(&state);
        session.on_event(kind, move |event| {
            let mut guard =
                state.lock().unwrap_or_else(PoisonError::into_inner);
            apply(&mut guard, event);
        });
    }
}
