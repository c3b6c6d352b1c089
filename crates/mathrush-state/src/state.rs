//! The game-state record and its parts.

use std::collections::HashMap;

use mathrush_protocol::{EffectId, PlayerId, PlayerRecord};

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// The logical screen the client shows.
///
/// ```text
///   Login ──(LobbyHello)──→ Lobby ──(NewQuestion)──→ Game
///                                        ↑
///   any screen ──(NewQuestion)───────────┘
/// ```
///
/// `NewQuestion` transitions to `Game` unconditionally, whatever was shown
/// before — the server deciding to play overrides everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Name entry; no connection-scoped state yet.
    #[default]
    Login,
    /// Waiting for the game to start, roster visible.
    Lobby,
    /// A question is live.
    Game,
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// The current prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Difficulty tier, 1–10 in practice.
    pub difficulty: u8,
    /// The prompt text.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Roster entries
// ---------------------------------------------------------------------------

/// One roster entry: a player as the client currently knows them.
///
/// This is wider than the wire [`PlayerRecord`] — it is the union of every
/// field any event ever references for a player id. Fields the roster
/// snapshot doesn't carry start zeroed and are filled in by dedicated
/// events (`OpponentScoreChanged`, `OpponentStatusChanged`,
/// `OpponentEliminated`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Last score pushed by the server. Absolute, never accumulated.
    pub score: u32,
    /// Active status effects, replaced wholesale on every update.
    pub effects: Vec<EffectId>,
    pub eliminated: bool,
}

impl From<PlayerRecord> for Player {
    fn from(record: PlayerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            score: 0,
            effects: Vec::new(),
            eliminated: false,
        }
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Everything the client knows about the current game.
///
/// Owned by the synchronizer; the UI only ever sees clones. All numeric
/// fields hold the last absolute value the server pushed — the reducer
/// never increments.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Every known player, keyed by id. Ids are unique; an event for an
    /// id already present overwrites that entry rather than duplicating.
    pub roster: HashMap<PlayerId, Player>,
    /// Self score.
    pub score: u32,
    /// Self coin balance.
    pub coins: u32,
    /// Self active effects, replaced wholesale on every update.
    pub effects: Vec<EffectId>,
    /// Score multiplier; 1.0 until the server says otherwise.
    pub score_multiplier: f32,
    /// Coin multiplier; 1.0 until the server says otherwise.
    pub coin_multiplier: f32,
    /// The live prompt, if any.
    pub question: Option<Question>,
    /// The answer being typed. Cleared whenever a new question arrives.
    pub answer_input: String,
    /// Which logical screen is shown.
    pub screen: Screen,
    /// Self final placement once eliminated.
    pub eliminated_place: Option<u8>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            roster: HashMap::new(),
            score: 0,
            coins: 0,
            effects: Vec::new(),
            score_multiplier: 1.0,
            coin_multiplier: 1.0,
            question: None,
            answer_input: String::new(),
            screen: Screen::Login,
            eliminated_place: None,
        }
    }
}

impl GameState {
    /// A fresh pre-connection state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether self has been eliminated.
    pub fn eliminated(&self) -> bool {
        self.eliminated_place.is_some()
    }
}
