//! The session: one live connection, listener fan-out, typed senders.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use mathrush_protocol::{
    decode_event, encode_command, ClientCommand, EventKind, PlayerId,
    Powerup, ProtocolError, ServerEvent,
};

use crate::config::ClientConfig;
use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

type EventHandler = Box<dyn Fn(&ServerEvent) + Send>;
type RawHandler = Box<dyn Fn(&[u8]) + Send>;

// ---------------------------------------------------------------------------
// CloseReason
// ---------------------------------------------------------------------------

/// Why a session stopped. Published exactly once, on the first cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The server closed the connection.
    Server,
    /// [`Session::close`] was called on this side.
    Local,
    /// An inbound frame failed to decode. The stream cannot be
    /// resynchronized after that, so the session shuts down.
    Protocol(String),
    /// The underlying socket failed.
    Transport(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => f.write_str("closed by server"),
            Self::Local => f.write_str("closed locally"),
            Self::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Default)]
struct HandlerTable {
    by_kind: HashMap<EventKind, Vec<EventHandler>>,
    raw: Vec<RawHandler>,
}

struct Shared {
    outbound: mpsc::UnboundedSender<Message>,
    handlers: Mutex<HandlerTable>,
    closed: AtomicBool,
    close_tx: watch::Sender<Option<CloseReason>>,
}

/// A live connection to the game server.
///
/// Cloning is cheap and every clone refers to the same connection; pass
/// clones to whichever components need to send or subscribe. The session
/// stays open until the server closes it, the transport fails, an inbound
/// frame fails to decode, or [`close`](Session::close) is called.
///
/// Inbound frames are decoded exactly once each, then fanned out to every
/// listener registered for that event's kind, in registration order.
/// Dispatch is single-threaded: one frame is fully processed before the
/// next is touched, so listeners never race each other.
#[derive(Clone)]
pub struct Session {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Connects to the server, announcing the given display name via the
    /// `?name=` query parameter.
    ///
    /// Resolves once the WebSocket handshake completes. The returned
    /// session is live: frames dispatch to listeners as they arrive. The
    /// server greets immediately on accept, so listeners that must see the
    /// greeting belong in [`connect_with`](Session::connect_with).
    ///
    /// # Errors
    /// Returns [`ClientError::Connect`] if the endpoint is unreachable or
    /// the handshake fails.
    pub async fn connect(
        config: &ClientConfig,
        name: &str,
    ) -> Result<Session, ClientError> {
        Self::connect_with(config, name, |_| {}).await
    }

    /// Like [`connect`](Session::connect), but runs `setup` on the new
    /// session before the first frame is dispatched.
    ///
    /// Listeners registered inside `setup` are guaranteed to see every
    /// frame, including whatever the server pushes the instant it accepts
    /// the connection.
    pub async fn connect_with(
        config: &ClientConfig,
        name: &str,
        setup: impl FnOnce(&Session),
    ) -> Result<Session, ClientError> {
        let url = config.url(name);
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .map_err(ClientError::Connect)?;
        tracing::info!(%url, "session connected");

        let (sink, stream) = ws.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (close_tx, _) = watch::channel(None);

        let session = Session {
            shared: Arc::new(Shared {
                outbound,
                handlers: Mutex::new(HandlerTable::default()),
                closed: AtomicBool::new(false),
                close_tx,
            }),
        };

        setup(&session);

        // The read loop only starts after `setup` ran; frames that arrived
        // in the meantime sit in the socket buffer.
        tokio::spawn(write_loop(sink, outbound_rx));
        tokio::spawn(read_loop(stream, Arc::clone(&session.shared)));

        Ok(session)
    }

    /// Registers `handler` for every decoded event of the given kind.
    ///
    /// Any number of handlers may be registered per kind; all of them run,
    /// in registration order, for each matching event. Registration never
    /// consumes or filters the event for other listeners. A panicking
    /// handler is logged and skipped; the remaining handlers still run.
    ///
    /// Handlers run on the session's dispatch task — keep them short, and
    /// don't register new handlers from inside one.
    pub fn on_event(
        &self,
        kind: EventKind,
        handler: impl Fn(&ServerEvent) + Send + 'static,
    ) {
        self.shared
            .lock_handlers()
            .by_kind
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    /// Diagnostics escape hatch: sees every inbound frame as raw bytes,
    /// before per-kind dispatch.
    pub fn raw_on_message(&self, handler: impl Fn(&[u8]) + Send + 'static) {
        self.shared.lock_handlers().raw.push(Box::new(handler));
    }

    /// Submits an answer to the current question.
    pub fn send_submit(&self, answer: i32) -> Result<(), ClientError> {
        self.raw_send(&ClientCommand::Submit { answer })
    }

    /// Buys a powerup and applies it to the given player.
    pub fn send_purchase(
        &self,
        powerup: Powerup,
        target: PlayerId,
    ) -> Result<(), ClientError> {
        self.raw_send(&ClientCommand::Purchase { powerup, target })
    }

    /// Asks the lobby to start without waiting for more players.
    pub fn send_skip_wait(&self) -> Result<(), ClientError> {
        self.raw_send(&ClientCommand::SkipWait)
    }

    /// Encodes and transmits any command immediately — no batching, no
    /// acknowledgement wait.
    ///
    /// # Errors
    /// - [`ClientError::Protocol`] — the command failed to encode; the
    ///   connection is unaffected and nothing was sent.
    /// - [`ClientError::Closed`] — the session is closed. Sends fail fast
    ///   rather than queueing; there is no open-pending state to guard,
    ///   since the handle only exists after `connect` resolved.
    pub fn raw_send(
        &self,
        command: &ClientCommand,
    ) -> Result<(), ClientError> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        let frame = encode_command(command)?;
        self.shared
            .outbound
            .send(Message::Binary(frame.into()))
            .map_err(|_| ClientError::Closed)
    }

    /// Closes the session. Idempotent.
    ///
    /// A close frame is flushed best-effort; listeners are not invoked for
    /// anything that arrives afterwards.
    pub fn close(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.publish_close(CloseReason::Local);
    }

    /// Whether the session has stopped dispatching.
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// The terminal close reason, once there is one.
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.shared.close_tx.borrow().clone()
    }

    /// Waits until the session is closed and returns why.
    pub async fn wait_closed(&self) -> CloseReason {
        let mut rx = self.shared.close_tx.subscribe();
        match rx.wait_for(Option::is_some).await {
            Ok(reason) => reason.clone().expect("checked by wait_for"),
            // The sender lives inside `shared`, which we hold; treat the
            // unreachable error arm as a local close.
            Err(_) => CloseReason::Local,
        }
    }
}

impl Shared {
    fn lock_handlers(&self) -> MutexGuard<'_, HandlerTable> {
        // A handler panic is caught before it can unwind through the
        // guard, so poisoning is unexpected; recover rather than die.
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decodes one frame and fans it out. Called only from the read loop.
    fn dispatch(&self, frame: &[u8]) -> Result<(), ProtocolError> {
        let event = decode_event(frame)?;
        let kind = event.kind();
        tracing::debug!(?kind, len = frame.len(), "event received");

        let table = self.lock_handlers();
        for handler in &table.raw {
            run_isolated(|| handler(frame));
        }
        if let Some(handlers) = table.by_kind.get(&kind) {
            for handler in handlers {
                run_isolated(|| handler(&event));
            }
        }
        Ok(())
    }

    /// Records the terminal close reason. First cause wins.
    ///
    /// Also queues a best-effort close frame: whatever ended the session,
    /// this is what lets the write task drain and exit.
    fn publish_close(&self, reason: CloseReason) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.outbound.send(Message::Close(None));
        let published = self.close_tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason.clone());
                true
            } else {
                false
            }
        });
        if published {
            tracing::info!(%reason, "session closed");
        }
    }
}

/// Runs one listener, containing any panic so the rest of the fan-out and
/// future frames still happen.
fn run_isolated(f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::warn!("event listener panicked; continuing dispatch");
    }
}

// ---------------------------------------------------------------------------
// Connection tasks
// ---------------------------------------------------------------------------

/// Drains the outbound queue into the socket. Exits after a close frame,
/// a send failure, or once every sender handle is gone.
async fn write_loop(
    mut sink: SplitSink<WsStream, Message>,
    mut outbound: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(message) = outbound.recv().await {
        let is_close = matches!(message, Message::Close(_));
        if let Err(e) = sink.send(message).await {
            tracing::debug!(error = %e, "outbound send failed");
            break;
        }
        if is_close {
            break;
        }
    }
}

/// Receives frames one at a time: decode, fan out, repeat. A frame is
/// fully processed before the next is read, so state mutations done by
/// listeners are free of cross-frame races by construction.
async fn read_loop(mut stream: SplitStream<WsStream>, shared: Arc<Shared>) {
    let reason = loop {
        let message = match stream.next().await {
            Some(message) => message,
            None => break CloseReason::Server,
        };
        // close() may have run while we were parked on the socket;
        // listeners must not fire after it.
        if shared.closed.load(Ordering::SeqCst) {
            break CloseReason::Local;
        }

        match message {
            Ok(Message::Binary(frame)) => {
                if let Some(fatal) = dispatch_frame(&shared, &frame) {
                    break fatal;
                }
            }
            // The server speaks binary; treat a stray text frame as bytes.
            Ok(Message::Text(text)) => {
                if let Some(fatal) = dispatch_frame(&shared, text.as_bytes())
                {
                    break fatal;
                }
            }
            Ok(Message::Close(_)) => break CloseReason::Server,
            Ok(_) => continue, // ping/pong handled by the stack
            Err(e) => break CloseReason::Transport(e.to_string()),
        }
    };
    shared.publish_close(reason);
}

/// Dispatches one frame; on decode failure returns the terminal reason.
/// A bad frame desynchronizes the stream, so it ends the session —
/// logged, never a crash.
fn dispatch_frame(shared: &Shared, frame: &[u8]) -> Option<CloseReason> {
    match shared.dispatch(frame) {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(error = %e, "undecodable frame, closing connection");
            Some(CloseReason::Protocol(e.to_string()))
        }
    }
}
