//! Snapshot visibility and scoring tests.

use crate::domain::rules::{hand_points, OPENING_HAND_SIZE};
use crate::domain::snapshot::snapshot;
use crate::domain::state::SessionStatus;
use crate::domain::test_state_helpers::{
    give_card, session_in_progress, set_top, trim_hand, waiting_session,
};
use crate::domain::turns::play_card;
use crate::domain::{CardKind, Color};

#[test]
fn viewer_sees_only_own_hand() {
    let session = session_in_progress(&[1, 2, 3], 21);
    let snap = snapshot(&session, Some(2));

    assert_eq!(snap.viewer_hand().len(), OPENING_HAND_SIZE);
    for m in &snap.members {
        assert_eq!(m.hand_size, OPENING_HAND_SIZE);
        assert_eq!(m.hand.is_some(), m.player_id == 2);
        assert!(m.hand_points.is_none());
    }
    assert!(snap.viewer_hand().iter().all(|c| c.is_held_by(2)));

    let anonymous = snapshot(&session, None);
    assert!(anonymous.members.iter().all(|m| m.hand.is_none()));
    assert!(anonymous.viewer_hand().is_empty());
}

#[test]
fn playable_ids_only_on_viewers_turn() {
    let mut session = session_in_progress(&[1, 2], 4);
    give_card(&mut session, 1, CardKind::Wild, Color::Wild);

    let mine = snapshot(&session, Some(1));
    assert_eq!(mine.current_player, Some(1));
    assert!(!mine.playable.is_empty());
    let hand_ids: Vec<_> = mine.viewer_hand().iter().map(|c| c.id).collect();
    assert!(mine.playable.iter().all(|id| hand_ids.contains(id)));

    let theirs = snapshot(&session, Some(2));
    assert!(theirs.playable.is_empty());
}

#[test]
fn waiting_snapshot_has_no_table() {
    let session = waiting_session(5, 2, 4, 0);
    let snap = snapshot(&session, Some(5));
    assert_eq!(snap.status, SessionStatus::WaitingForPlayers);
    assert_eq!(snap.current_player, None);
    assert_eq!(snap.top_card, None);
    assert_eq!(snap.draw_pile_size, 0);
    assert_eq!(snap.last_sequence, 1);
    assert_eq!(snap.founder, 5);
}

#[test]
fn finished_snapshot_reports_points() {
    let mut session = session_in_progress(&[1, 2, 3], 8);
    set_top(&mut session, CardKind::Number(6), Color::Green);
    trim_hand(&mut session, 1, 0);
    let last = give_card(&mut session, 1, CardKind::Number(2), Color::Green);
    play_card(&mut session, 1, last, None).unwrap();

    let snap = snapshot(&session, None);
    assert_eq!(snap.status, SessionStatus::Finished);
    assert_eq!(snap.winner, Some(1));
    let expected: u32 = [2, 3]
        .into_iter()
        .map(|p| hand_points(session.hand(p)))
        .sum();
    assert_eq!(snap.winner_score, Some(expected));
    assert_eq!(snap.member(1).unwrap().hand_points, Some(0));
    assert_eq!(
        snap.member(2).unwrap().hand_points,
        Some(hand_points(session.hand(2)))
    );
}

#[test]
fn snapshot_serializes_screaming_enums() {
    let session = session_in_progress(&[1, 2], 2);
    let json = serde_json::to_value(snapshot(&session, Some(1))).unwrap();
    assert_eq!(json["status"], "IN_PROGRESS");
    assert_eq!(json["direction"], "CLOCKWISE");
    assert_eq!(json["top_card"]["kind"]["type"], "NUMBER");
    assert!(json["members"][1].get("hand").is_none());
}
