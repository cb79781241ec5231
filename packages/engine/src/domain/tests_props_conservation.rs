/// Property-based tests for card conservation and event sequencing
use proptest::prelude::*;

use crate::domain::state::SessionStatus;
use crate::domain::test_state_helpers::{bot_turn, session_in_progress};
use crate::domain::turns::leave;
use crate::domain::{test_gens, test_prelude, PlayerId};
use crate::errors::domain::{DomainError, ExhaustedKind};

fn players(n: usize) -> Vec<PlayerId> {
    (1..=n as PlayerId).collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: every operation in a random game keeps all 108 cards in
    /// exactly one location and the event sequence gap-free.
    #[test]
    fn prop_cards_conserved_through_random_play(
        seed in any::<u64>(),
        n in test_gens::player_count(),
        choices in test_gens::choices(300),
    ) {
        let mut session = session_in_progress(&players(n), seed);
        prop_assert!(session.check_invariants().is_ok());

        for choice in choices {
            if session.status() != SessionStatus::InProgress {
                break;
            }
            let before = session.clone();
            match bot_turn(&mut session, choice) {
                Ok(_) => {}
                Err(DomainError::Exhausted(ExhaustedKind::DeckExhausted, _)) => {
                    // Rejected operations leave no trace.
                    prop_assert_eq!(&session.memberships, &before.memberships);
                    prop_assert_eq!(&session.draw_pile, &before.draw_pile);
                    prop_assert_eq!(session.events().len(), before.events().len());
                    break;
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
            if let Err(e) = session.check_invariants() {
                prop_assert!(false, "{}", e);
            }
        }

        let seqs: Vec<u64> = session.events().iter().map(|e| e.sequence).collect();
        let expected: Vec<u64> = (1..=seqs.len() as u64).collect();
        prop_assert_eq!(seqs, expected);
    }

    /// Property: a player leaving mid-game keeps cards conserved and the
    /// turn pointer inside the active rotation.
    #[test]
    fn prop_leave_keeps_pointer_valid(
        seed in any::<u64>(),
        n in 3usize..=4,
        leaver in 0usize..4,
        warmup in test_gens::choices(20),
    ) {
        let ids = players(n);
        let mut session = session_in_progress(&ids, seed);
        for choice in warmup {
            if session.status() != SessionStatus::InProgress
                || bot_turn(&mut session, choice).is_err()
            {
                break;
            }
        }
        prop_assume!(session.status() == SessionStatus::InProgress);

        let leaver = ids[leaver % n];
        let current = session.current_player();
        leave(&mut session, leaver).unwrap();

        prop_assert_eq!(session.status(), SessionStatus::InProgress);
        prop_assert!(session.check_invariants().is_ok());
        if current != Some(leaver) {
            prop_assert_eq!(session.current_player(), current);
        }
        prop_assert!(session.current_player() != Some(leaver));
    }
}
