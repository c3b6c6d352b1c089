//! Core types for the Mathrush wire format.
//!
//! Everything in this module either travels on the wire directly or names
//! something that does. The two tagged unions — [`ClientCommand`] for the
//! client→server direction and [`ServerEvent`] for server→client — are
//! closed enums keyed by a one-byte opcode, so adding an opcode is a
//! compile-time-checked change at every encode and decode site.

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier, stable for the lifetime of the connection.
///
/// On the wire this is a single byte; the newtype keeps it from being
/// confused with other small integers (answers, places, powerup ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A status-effect identifier: a transient modifier currently active on a
/// player. Two bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub u16);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Powerups
// ---------------------------------------------------------------------------

/// A purchasable effect applied to self or an opponent.
///
/// The discriminant is the wire id (byte 1 of a Purchase frame). Costs are
/// fixed server-side; they are mirrored here so a client can grey out
/// unaffordable powerups without a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Powerup {
    /// Multiplies coin gains for self.
    CoinMultiplier = 0,
    /// Multiplies score gains for self.
    ScoreMultiplier = 1,
    /// Skips the current question.
    SkipQuestion = 2,
    /// Lowers question difficulty for self.
    EasyMode = 3,
    /// Counts one answer twice.
    DoubleTap = 4,
    /// Drains coins from the targeted opponent.
    CoinLeak = 5,
    /// Raises question difficulty for the targeted opponent.
    HardMode = 6,
}

impl Powerup {
    /// The wire id for this powerup.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a powerup by wire id. Returns `None` for ids outside 0–6.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::CoinMultiplier),
            1 => Some(Self::ScoreMultiplier),
            2 => Some(Self::SkipQuestion),
            3 => Some(Self::EasyMode),
            4 => Some(Self::DoubleTap),
            5 => Some(Self::CoinLeak),
            6 => Some(Self::HardMode),
            _ => None,
        }
    }

    /// Price in coins.
    pub fn cost(self) -> u32 {
        match self {
            Self::CoinMultiplier => 20,
            Self::ScoreMultiplier => 30,
            Self::SkipQuestion => 50,
            Self::EasyMode => 200,
            Self::DoubleTap => 200,
            Self::CoinLeak => 300,
            Self::HardMode => 500,
        }
    }
}

impl fmt::Display for Powerup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CoinMultiplier => "coin-multiplier",
            Self::ScoreMultiplier => "score-multiplier",
            Self::SkipQuestion => "skip-question",
            Self::EasyMode => "easy-mode",
            Self::DoubleTap => "double-tap",
            Self::CoinLeak => "coin-leak",
            Self::HardMode => "hard-mode",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// A player as it appears inside `LobbyHello` and `NewPlayer` frames:
/// one byte id, one byte name length, then the UTF-8 name.
///
/// The wire record carries identity only. Status effects, score, and
/// elimination arrive later through dedicated events, so freshly decoded
/// players start without any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Wire id, unique within the lobby.
    pub id: PlayerId,
    /// Display name, at most 255 UTF-8 bytes.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Client → server commands
// ---------------------------------------------------------------------------

// Client→server opcodes.
pub const OPCODE_REGISTER: u8 = 0;
pub const OPCODE_SUBMIT: u8 = 1;
pub const OPCODE_PURCHASE: u8 = 2;
pub const OPCODE_SKIP_WAIT: u8 = 3;

/// A command the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Declares the display name.
    ///
    /// The live session sends the name as a connect-time query parameter
    /// instead; this frame exists because the wire format defines it and
    /// remains reachable through `raw_send`.
    Register {
        /// Display name, at most 255 UTF-8 bytes.
        name: String,
    },

    /// Answers the current question.
    Submit {
        /// The numeric answer, as typed.
        answer: i32,
    },

    /// Buys a powerup and applies it to a player.
    Purchase {
        /// Which powerup to buy.
        powerup: Powerup,
        /// The player to apply it to. Id 0 can mean "self" depending on
        /// the powerup.
        target: PlayerId,
    },

    /// Asks the lobby to start without waiting for more players.
    SkipWait,
}

impl ClientCommand {
    /// The opcode byte that leads this command's frame.
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Register { .. } => OPCODE_REGISTER,
            Self::Submit { .. } => OPCODE_SUBMIT,
            Self::Purchase { .. } => OPCODE_PURCHASE,
            Self::SkipWait => OPCODE_SKIP_WAIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client events
// ---------------------------------------------------------------------------

// Server→client opcodes.
pub const OPCODE_HUB_HELLO: u8 = 0;
pub const OPCODE_LOBBY_HELLO: u8 = 1;
pub const OPCODE_NEW_PLAYER: u8 = 2;
pub const OPCODE_CORRECT_SUBMISSION: u8 = 3;
pub const OPCODE_NEW_QUESTION: u8 = 4;
pub const OPCODE_PURCHASE_CONFIRMED: u8 = 5;
pub const OPCODE_STATUS_CHANGED: u8 = 6;
pub const OPCODE_OPPONENT_STATUS_CHANGED: u8 = 7;
pub const OPCODE_ELIMINATED: u8 = 8;
pub const OPCODE_OPPONENT_ELIMINATED: u8 = 9;
pub const OPCODE_OPPONENT_SCORE_CHANGED: u8 = 10;
pub const OPCODE_MULTIPLIERS_CHANGED: u8 = 11;

/// An event the server pushes to the client.
///
/// Score, coin, effect, and multiplier payloads are absolute values, never
/// deltas — the server is the sole source of truth for these quantities.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Connection acknowledged. No payload.
    HubHello,

    /// Initial roster snapshot on joining a lobby.
    LobbyHello {
        /// Every player already present, self included.
        players: Vec<PlayerRecord>,
    },

    /// A player joined the lobby.
    NewPlayer {
        /// The joining player's record.
        player: PlayerRecord,
    },

    /// Self score and coin balance after a correct answer.
    CorrectSubmission { score: u32, coins: u32 },

    /// A new prompt. Receiving this moves the client to the in-game screen.
    NewQuestion {
        /// Difficulty tier, 1–10 in practice.
        difficulty: u8,
        /// The prompt text.
        question: String,
    },

    /// Self coin balance after a purchase went through.
    PurchaseConfirmed { coins: u32 },

    /// Self active-effects set, replaced wholesale.
    StatusChanged { effects: Vec<EffectId> },

    /// One opponent's active-effects set, replaced wholesale.
    OpponentStatusChanged {
        player_id: PlayerId,
        effects: Vec<EffectId>,
    },

    /// Self eliminated, with final placement.
    Eliminated { place: u8 },

    /// One opponent eliminated.
    OpponentEliminated { player_id: PlayerId },

    /// One opponent's score updated.
    OpponentScoreChanged { player_id: PlayerId, score: u32 },

    /// Self score and coin multipliers updated.
    MultipliersChanged {
        score_multiplier: f32,
        coin_multiplier: f32,
    },
}

impl ServerEvent {
    /// The kind discriminant for this event, used as the dispatch key.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::HubHello => EventKind::HubHello,
            Self::LobbyHello { .. } => EventKind::LobbyHello,
            Self::NewPlayer { .. } => EventKind::NewPlayer,
            Self::CorrectSubmission { .. } => EventKind::CorrectSubmission,
            Self::NewQuestion { .. } => EventKind::NewQuestion,
            Self::PurchaseConfirmed { .. } => EventKind::PurchaseConfirmed,
            Self::StatusChanged { .. } => EventKind::StatusChanged,
            Self::OpponentStatusChanged { .. } => {
                EventKind::OpponentStatusChanged
            }
            Self::Eliminated { .. } => EventKind::Eliminated,
            Self::OpponentEliminated { .. } => EventKind::OpponentEliminated,
            Self::OpponentScoreChanged { .. } => {
                EventKind::OpponentScoreChanged
            }
            Self::MultipliersChanged { .. } => EventKind::MultipliersChanged,
        }
    }
}

// ---------------------------------------------------------------------------
// EventKind — dispatch keys
// ---------------------------------------------------------------------------

/// The kind of a [`ServerEvent`], without its payload.
///
/// Listeners subscribe by kind; the session uses this as its dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HubHello,
    LobbyHello,
    NewPlayer,
    CorrectSubmission,
    NewQuestion,
    PurchaseConfirmed,
    StatusChanged,
    OpponentStatusChanged,
    Eliminated,
    OpponentEliminated,
    OpponentScoreChanged,
    MultipliersChanged,
}

impl EventKind {
    /// Every kind, in opcode order.
    pub const ALL: [EventKind; 12] = [
        EventKind::HubHello,
        EventKind::LobbyHello,
        EventKind::NewPlayer,
        EventKind::CorrectSubmission,
        EventKind::NewQuestion,
        EventKind::PurchaseConfirmed,
        EventKind::StatusChanged,
        EventKind::OpponentStatusChanged,
        EventKind::Eliminated,
        EventKind::OpponentEliminated,
        EventKind::OpponentScoreChanged,
        EventKind::MultipliersChanged,
    ];

    /// The opcode byte that tags frames of this kind.
    pub fn opcode(self) -> u8 {
        match self {
            Self::HubHello => OPCODE_HUB_HELLO,
            Self::LobbyHello => OPCODE_LOBBY_HELLO,
            Self::NewPlayer => OPCODE_NEW_PLAYER,
            Self::CorrectSubmission => OPCODE_CORRECT_SUBMISSION,
            Self::NewQuestion => OPCODE_NEW_QUESTION,
            Self::PurchaseConfirmed => OPCODE_PURCHASE_CONFIRMED,
            Self::StatusChanged => OPCODE_STATUS_CHANGED,
            Self::OpponentStatusChanged => OPCODE_OPPONENT_STATUS_CHANGED,
            Self::Eliminated => OPCODE_ELIMINATED,
            Self::OpponentEliminated => OPCODE_OPPONENT_ELIMINATED,
            Self::OpponentScoreChanged => OPCODE_OPPONENT_SCORE_CHANGED,
            Self::MultipliersChanged => OPCODE_MULTIPLIERS_CHANGED,
        }
    }

    /// Looks up a kind by opcode. Returns `None` for opcodes outside 0–11.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.get(opcode as usize).copied()
    }
}

// =========================================================================
// Tests
// =========================================================================
