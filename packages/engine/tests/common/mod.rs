#![allow(dead_code)]

pub mod proptest_prelude;

use engine_test_support::unique_helpers::unique_player_ids;
use uno_engine::{Color, DomainError, PlayerId, SessionRegistry, SessionSnapshot, SessionStatus};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    engine_test_support::logging::init();
}

/// Create a session with `n` fresh players joined, so the game has started.
pub fn started_game(registry: &SessionRegistry, n: usize, seed: u64) -> (String, Vec<PlayerId>) {
    let players = unique_player_ids(n);
    let code = registry
        .create_with_seed(players[0], Some(n), Some(n), seed)
        .expect("create session")
        .code;
    for &p in &players[1..] {
        registry.join(&code, p).expect("join session");
    }
    (code, players)
}

/// Take the current player's turn through the public API: play the
/// `choice`-th playable card or draw when nothing fits.
pub fn bot_turn(
    registry: &SessionRegistry,
    code: &str,
    choice: usize,
) -> Result<SessionSnapshot, DomainError> {
    let player = registry
        .lookup(code)?
        .current_player
        .expect("game in progress");
    let view = registry.snapshot(code, player)?;
    if view.playable.is_empty() {
        return registry.draw_card(code, player);
    }
    let id = view.playable[choice % view.playable.len()];
    let card = view
        .viewer_hand()
        .iter()
        .find(|c| c.id == id)
        .copied()
        .expect("playable card is in hand");
    let color = card
        .kind
        .is_wild()
        .then(|| Color::PLAYABLE[choice % Color::PLAYABLE.len()]);
    registry.play_card(code, player, id, color)
}

/// Drive a game with bot turns until it ends, stalls on an exhausted deck,
/// or `max_turns` pass. Returns the final public snapshot.
pub fn play_out(registry: &SessionRegistry, code: &str, max_turns: usize) -> SessionSnapshot {
    for turn in 0..max_turns {
        let snap = registry.lookup(code).expect("session exists");
        if snap.status != SessionStatus::InProgress {
            return snap;
        }
        match bot_turn(registry, code, turn * 7 + 3) {
            Ok(_) => {}
            Err(e) if e.code() == uno_engine::ErrorCode::DeckExhausted => break,
            Err(e) => panic!("unexpected error on turn {turn}: {e}"),
        }
        registry
            .inspect(code, |s| s.check_invariants())
            .expect("session exists")
            .expect("invariants hold");
    }
    registry.lookup(code).expect("session exists")
}
