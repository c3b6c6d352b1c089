//! The event reducer: folds server events into [`GameState`].

use mathrush_protocol::ServerEvent;

use crate::state::{GameState, Player, Question, Screen};

/// Applies one decoded event to the state.
///
/// Every update is a whole-value replacement — scores, coins, effect
/// lists, and multipliers arrive as absolutes, so applying the same event
/// twice lands in the same state as applying it once.
///
/// Events naming a player id the roster has never seen are logged no-ops,
/// never panics: the transport edge can reorder a join relative to the
/// events that follow it.
pub fn apply(state: &mut GameState, event: &ServerEvent) {
    match event {
        // Connection acknowledged; carries nothing to fold in.
        ServerEvent::HubHello => {}

        ServerEvent::LobbyHello { players } => {
            // Merge the snapshot: listed players overwrite, entries the
            // snapshot doesn't mention stay as they are.
            for record in players {
                state
                    .roster
                    .insert(record.id, Player::from(record.clone()));
            }
            state.screen = Screen::Lobby;
        }

        ServerEvent::NewPlayer { player } => {
            state
                .roster
                .insert(player.id, Player::from(player.clone()));
        }

        ServerEvent::CorrectSubmission { score, coins } => {
            state.score = *score;
            state.coins = *coins;
        }

        ServerEvent::NewQuestion {
            difficulty,
            question,
        } => {
            state.question = Some(Question {
                difficulty: *difficulty,
                text: question.clone(),
            });
            state.answer_input.clear();
            state.screen = Screen::Game;
        }

        ServerEvent::PurchaseConfirmed { coins } => {
            state.coins = *coins;
        }

        ServerEvent::StatusChanged { effects } => {
            state.effects = effects.clone();
        }

        ServerEvent::OpponentStatusChanged { player_id, effects } => {
            match state.roster.get_mut(player_id) {
                Some(player) => player.effects = effects.clone(),
                None => {
                    tracing::debug!(
                        %player_id,
                        "status change for unknown player, ignoring"
                    );
                }
            }
        }

        ServerEvent::Eliminated { place } => {
            state.eliminated_place = Some(*place);
        }

        ServerEvent::OpponentEliminated { player_id } => {
            match state.roster.get_mut(player_id) {
                Some(player) => player.eliminated = true,
                None => {
                    tracing::debug!(
                        %player_id,
                        "elimination for unknown player, ignoring"
                    );
                }
            }
        }

        ServerEvent::OpponentScoreChanged { player_id, score } => {
            match state.roster.get_mut(player_id) {
                Some(player) => player.score = *score,
                None => {
                    tracing::debug!(
                        %player_id,
                        "score change for unknown player, ignoring"
                    );
                }
            }
        }

        ServerEvent::MultipliersChanged {
            score_multiplier,
            coin_multiplier,
        } => {
            state.score_multiplier = *score_multiplier;
            state.coin_multiplier = *coin_multiplier;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mathrush_protocol::{EffectId, PlayerId, PlayerRecord};

    fn record(id: u8, name: &str) -> PlayerRecord {
        PlayerRecord {
            id: PlayerId(id),
            name: name.into(),
        }
    }

    #[test]
    fn test_lobby_hello_merges_and_preserves_unlisted_entries() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::NewPlayer {
                player: record(9, "Old"),
            },
        );

        apply(
            &mut state,
            &ServerEvent::LobbyHello {
                players: vec![record(1, "Ada"), record(2, "Bob")],
            },
        );

        assert_eq!(state.roster.len(), 3);
        assert_eq!(state.roster[&PlayerId(9)].name, "Old");
        assert_eq!(state.roster[&PlayerId(1)].name, "Ada");
        assert_eq!(state.screen, Screen::Lobby);
    }

    #[test]
    fn test_new_player_overwrites_same_id_without_duplicating() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::NewPlayer {
                player: record(1, "Ada"),
            },
        );
        apply(
            &mut state,
            &ServerEvent::NewPlayer {
                player: record(1, "Ada II"),
            },
        );

        assert_eq!(state.roster.len(), 1);
        assert_eq!(state.roster[&PlayerId(1)].name, "Ada II");
    }

    #[test]
    fn test_correct_submission_is_absolute_not_additive() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::CorrectSubmission {
                score: 50,
                coins: 3,
            },
        );
        apply(
            &mut state,
            &ServerEvent::CorrectSubmission {
                score: 10,
                coins: 1,
            },
        );

        // Last write wins, no summation.
        assert_eq!(state.score, 10);
        assert_eq!(state.coins, 1);
    }

    #[test]
    fn test_new_question_replaces_prompt_and_clears_input() {
        let mut state = GameState::new();
        state.answer_input = "12".into();

        apply(
            &mut state,
            &ServerEvent::NewQuestion {
                difficulty: 2,
                question: "3 + 4".into(),
            },
        );

        let question = state.question.as_ref().unwrap();
        assert_eq!(question.text, "3 + 4");
        assert_eq!(question.difficulty, 2);
        assert!(state.answer_input.is_empty());
    }

    #[test]
    fn test_new_question_forces_game_screen_from_any_screen() {
        for start in [Screen::Login, Screen::Lobby, Screen::Game] {
            let mut state = GameState::new();
            state.screen = start;
            apply(
                &mut state,
                &ServerEvent::NewQuestion {
                    difficulty: 1,
                    question: "1 + 1".into(),
                },
            );
            assert_eq!(state.screen, Screen::Game);
        }
    }

    #[test]
    fn test_purchase_confirmed_overwrites_coins() {
        let mut state = GameState::new();
        state.coins = 500;
        apply(&mut state, &ServerEvent::PurchaseConfirmed { coins: 480 });
        assert_eq!(state.coins, 480);
    }

    #[test]
    fn test_status_changed_is_idempotent() {
        let event = ServerEvent::StatusChanged {
            effects: vec![EffectId(2)],
        };

        let mut once = GameState::new();
        apply(&mut once, &event);

        let mut twice = GameState::new();
        apply(&mut twice, &event);
        apply(&mut twice, &event);

        assert_eq!(once.effects, twice.effects);
        assert_eq!(once.effects, vec![EffectId(2)]);
    }

    #[test]
    fn test_status_changed_replaces_wholesale() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::StatusChanged {
                effects: vec![EffectId(1), EffectId(2)],
            },
        );
        apply(
            &mut state,
            &ServerEvent::StatusChanged {
                effects: vec![EffectId(3)],
            },
        );
        assert_eq!(state.effects, vec![EffectId(3)]);
    }

    #[test]
    fn test_opponent_status_lands_on_named_entry() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::NewPlayer {
                player: record(1, "A"),
            },
        );
        apply(
            &mut state,
            &ServerEvent::OpponentStatusChanged {
                player_id: PlayerId(1),
                effects: vec![EffectId(1), EffectId(2)],
            },
        );

        let player = &state.roster[&PlayerId(1)];
        assert_eq!(player.name, "A");
        assert_eq!(player.effects, vec![EffectId(1), EffectId(2)]);
    }

    #[test]
    fn test_events_for_unknown_ids_are_no_ops() {
        let mut state = GameState::new();

        apply(
            &mut state,
            &ServerEvent::OpponentEliminated {
                player_id: PlayerId(99),
            },
        );
        apply(
            &mut state,
            &ServerEvent::OpponentStatusChanged {
                player_id: PlayerId(99),
                effects: vec![EffectId(1)],
            },
        );
        apply(
            &mut state,
            &ServerEvent::OpponentScoreChanged {
                player_id: PlayerId(99),
                score: 10,
            },
        );

        assert!(state.roster.is_empty());
    }

    #[test]
    fn test_opponent_eliminated_marks_entry() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::NewPlayer {
                player: record(5, "E"),
            },
        );
        apply(
            &mut state,
            &ServerEvent::OpponentEliminated {
                player_id: PlayerId(5),
            },
        );
        assert!(state.roster[&PlayerId(5)].eliminated);
    }

    #[test]
    fn test_opponent_score_changed_overwrites() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::NewPlayer {
                player: record(5, "E"),
            },
        );
        apply(
            &mut state,
            &ServerEvent::OpponentScoreChanged {
                player_id: PlayerId(5),
                score: 40,
            },
        );
        apply(
            &mut state,
            &ServerEvent::OpponentScoreChanged {
                player_id: PlayerId(5),
                score: 25,
            },
        );
        assert_eq!(state.roster[&PlayerId(5)].score, 25);
    }

    #[test]
    fn test_self_elimination_sets_place() {
        let mut state = GameState::new();
        apply(&mut state, &ServerEvent::Eliminated { place: 3 });
        assert_eq!(state.eliminated_place, Some(3));
        assert!(state.eliminated());
    }

    #[test]
    fn test_multipliers_changed_overwrites_both() {
        let mut state = GameState::new();
        apply(
            &mut state,
            &ServerEvent::MultipliersChanged {
                score_multiplier: 2.0,
                coin_multiplier: 0.5,
            },
        );
        assert_eq!(state.score_multiplier, 2.0);
        assert_eq!(state.coin_multiplier, 0.5);
    }

    #[test]
    fn test_hub_hello_changes_nothing() {
        let mut state = GameState::new();
        let before = state.clone();
        apply(&mut state, &ServerEvent::HubHello);
        assert_eq!(state, before);
    }
}
