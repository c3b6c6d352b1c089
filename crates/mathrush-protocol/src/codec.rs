//! Binary encoding and decoding for Mathrush frames.
//!
//! Pure functions over byte slices — no I/O, no state. [`encode_command`]
//! covers the client→server direction and [`decode_event`] the
//! server→client direction; the opposite halves live on the server.
//!
//! Every read is bounds-checked through [`ByteReader`], so a malformed or
//! truncated frame surfaces as a [`ProtocolError`] instead of a panic.
//! Callers must treat a decode error as fatal for the connection: frame
//! boundaries come from the transport, and a frame that stops short means
//! the stream can no longer be trusted.

use crate::error::ProtocolError;
use crate::types::{
    ClientCommand, EffectId, PlayerId, PlayerRecord, ServerEvent,
    OPCODE_CORRECT_SUBMISSION, OPCODE_ELIMINATED, OPCODE_HUB_HELLO,
    OPCODE_LOBBY_HELLO, OPCODE_MULTIPLIERS_CHANGED, OPCODE_NEW_PLAYER,
    OPCODE_NEW_QUESTION, OPCODE_OPPONENT_ELIMINATED,
    OPCODE_OPPONENT_SCORE_CHANGED, OPCODE_OPPONENT_STATUS_CHANGED,
    OPCODE_PURCHASE, OPCODE_PURCHASE_CONFIRMED, OPCODE_REGISTER,
    OPCODE_SKIP_WAIT, OPCODE_STATUS_CHANGED, OPCODE_SUBMIT,
};

/// Upper bound on a display name, fixed by the one-byte length prefix.
pub const MAX_NAME_BYTES: usize = 255;

// ---------------------------------------------------------------------------
// Encoding (client → server)
// ---------------------------------------------------------------------------

/// Serializes a command into one wire frame.
///
/// # Errors
///
/// Returns [`ProtocolError::NameTooLong`] when a `Register` name exceeds
/// [`MAX_NAME_BYTES`] UTF-8 bytes. Nothing else can fail: the command enum
/// is closed, so there is no unknown discriminant to reject.
pub fn encode_command(
    command: &ClientCommand,
) -> Result<Vec<u8>, ProtocolError> {
    match command {
        ClientCommand::Register { name } => {
            let name = name.as_bytes();
            if name.len() > MAX_NAME_BYTES {
                return Err(ProtocolError::NameTooLong { len: name.len() });
            }
            let mut frame = Vec::with_capacity(2 + name.len());
            frame.push(OPCODE_REGISTER);
            frame.push(name.len() as u8);
            frame.extend_from_slice(name);
            Ok(frame)
        }

        ClientCommand::Submit { answer } => {
            let mut frame = Vec::with_capacity(5);
            frame.push(OPCODE_SUBMIT);
            frame.extend_from_slice(&answer.to_be_bytes());
            Ok(frame)
        }

        ClientCommand::Purchase { powerup, target } => {
            Ok(vec![OPCODE_PURCHASE, powerup.id(), target.0])
        }

        ClientCommand::SkipWait => Ok(vec![OPCODE_SKIP_WAIT]),
    }
}

// ---------------------------------------------------------------------------
// Decoding (server → client)
// ---------------------------------------------------------------------------

/// Parses one wire frame into a typed event.
///
/// # Errors
///
/// - [`ProtocolError::UnknownOpcode`] — the leading byte matches no event.
/// - [`ProtocolError::Truncated`] — the frame ends before the payload the
///   opcode demands.
/// - [`ProtocolError::InvalidText`] — a text field is not valid UTF-8.
pub fn decode_event(frame: &[u8]) -> Result<ServerEvent, ProtocolError> {
    let mut r = ByteReader::new(frame);
    let opcode = r.u8()?;

    let event = match opcode {
        OPCODE_HUB_HELLO => ServerEvent::HubHello,

        OPCODE_LOBBY_HELLO => {
            let count = r.u8()? as usize;
            let mut players = Vec::with_capacity(count);
            for _ in 0..count {
                players.push(read_player(&mut r)?);
            }
            ServerEvent::LobbyHello { players }
        }

        OPCODE_NEW_PLAYER => ServerEvent::NewPlayer {
            player: read_player(&mut r)?,
        },

        OPCODE_CORRECT_SUBMISSION => ServerEvent::CorrectSubmission {
            score: r.u32()?,
            coins: r.u32()?,
        },

        OPCODE_NEW_QUESTION => {
            let difficulty = r.u8()?;
            let len = r.u16()? as usize;
            let question = r.text(len)?;
            ServerEvent::NewQuestion {
                difficulty,
                question,
            }
        }

        OPCODE_PURCHASE_CONFIRMED => {
            ServerEvent::PurchaseConfirmed { coins: r.u32()? }
        }

        OPCODE_STATUS_CHANGED => ServerEvent::StatusChanged {
            effects: read_effects(&mut r)?,
        },

        OPCODE_OPPONENT_STATUS_CHANGED => {
            let player_id = PlayerId(r.u8()?);
            ServerEvent::OpponentStatusChanged {
                player_id,
                effects: read_effects(&mut r)?,
            }
        }

        OPCODE_ELIMINATED => ServerEvent::Eliminated { place: r.u8()? },

        OPCODE_OPPONENT_ELIMINATED => ServerEvent::OpponentEliminated {
            player_id: PlayerId(r.u8()?),
        },

        OPCODE_OPPONENT_SCORE_CHANGED => ServerEvent::OpponentScoreChanged {
            player_id: PlayerId(r.u8()?),
            score: r.u32()?,
        },

        OPCODE_MULTIPLIERS_CHANGED => ServerEvent::MultipliersChanged {
            score_multiplier: r.f32()?,
            coin_multiplier: r.f32()?,
        },

        other => return Err(ProtocolError::UnknownOpcode(other)),
    };

    Ok(event)
}

/// Reads a player record: u8 id, u8 name length, then the UTF-8 name.
fn read_player(r: &mut ByteReader<'_>) -> Result<PlayerRecord, ProtocolError> {
    let id = PlayerId(r.u8()?);
    let len = r.u8()? as usize;
    let name = r.text(len)?;
    Ok(PlayerRecord { id, name })
}

/// Reads an effect list: u16 count, then that many u16 effect ids.
fn read_effects(
    r: &mut ByteReader<'_>,
) -> Result<Vec<EffectId>, ProtocolError> {
    let count = r.u16()? as usize;
    // The claimed count is untrusted; cap the pre-allocation and let the
    // bounds-checked reads reject a frame that lied.
    let mut effects = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        effects.push(EffectId(r.u16()?));
    }
    Ok(effects)
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A bounds-checked cursor over a frame.
///
/// Reads advance the position; a read past the end reports how many bytes
/// were missing and where, which is what ends up in logs when the server
/// misbehaves.
struct ByteReader<'a> {
    frame: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(frame: &'a [u8]) -> Self {
        Self { frame, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let remaining = self.frame.len() - self.pos;
        if remaining < n {
            return Err(ProtocolError::Truncated {
                offset: self.pos,
                needed: n - remaining,
            });
        }
        let slice = &self.frame[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ProtocolError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ProtocolError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f32(&mut self) -> Result<f32, ProtocolError> {
        let b = self.take(4)?;
        Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn text(&mut self, len: usize) -> Result<String, ProtocolError> {
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(ProtocolError::InvalidText)
    }
}

// =========================================================================
// Tests
// =========================================================================
