/// Property-based tests for turn advancement and low-hand declarations
use proptest::prelude::*;

use crate::domain::state::{seat_offset, SessionStatus};
use crate::domain::test_state_helpers::{bot_turn, session_in_progress};
use crate::domain::turns::declare_low_hand;
use crate::domain::{test_gens, test_prelude, CardKind, PlayerId};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: after each turn the pointer moves as the played card dictates.
    /// Draws and plain cards move one seat, skip effects move exactly two,
    /// a reverse moves one seat in the new direction (none with two players).
    #[test]
    fn prop_turn_advances_per_card_effect(
        seed in any::<u64>(),
        n in test_gens::player_count(),
        choices in test_gens::choices(200),
    ) {
        let ids: Vec<PlayerId> = (1..=n as PlayerId).collect();
        let mut session = session_in_progress(&ids, seed);

        for choice in choices {
            if session.status() != SessionStatus::InProgress {
                break;
            }
            let seat = session.current_player_index();
            let Ok(outcome) = bot_turn(&mut session, choice) else {
                break;
            };
            if session.status() != SessionStatus::InProgress {
                break;
            }
            let delta = session.direction().delta();
            let expected = match outcome.map(|o| o.card.kind) {
                None => seat_offset(seat, delta, n),
                Some(CardKind::Skip | CardKind::DrawTwo | CardKind::WildDrawFour) => {
                    seat_offset(seat, 2 * delta, n)
                }
                Some(CardKind::Reverse) if n == 2 => seat,
                Some(_) => seat_offset(seat, delta, n),
            };
            prop_assert_eq!(session.current_player_index(), expected);
        }
    }

    /// Property: a low-hand declaration only survives while the hand holds
    /// exactly one card.
    #[test]
    fn prop_low_hand_declaration_resets(
        seed in any::<u64>(),
        n in test_gens::player_count(),
        choices in test_gens::choices(300),
    ) {
        let ids: Vec<PlayerId> = (1..=n as PlayerId).collect();
        let mut session = session_in_progress(&ids, seed);

        for choice in choices {
            if session.status() != SessionStatus::InProgress {
                break;
            }
            for &p in &ids {
                if session.membership(p).is_some_and(|m| m.should_declare_low_hand()) {
                    declare_low_hand(&mut session, p).unwrap();
                }
            }
            if bot_turn(&mut session, choice).is_err() {
                break;
            }
            for m in session.memberships() {
                if m.declared_low_hand {
                    prop_assert_eq!(m.hand_size(), 1, "player {}", m.player_id);
                }
            }
        }
    }
}
