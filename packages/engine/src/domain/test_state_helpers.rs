//! Test-only session builders for domain unit tests.

use crate::domain::deck::build_deck;
use crate::domain::draw_pile::{draw, place_on_discard, remove_from_hand};
use crate::domain::rules::{playable_cards, OPENING_HAND_SIZE};
use crate::domain::state::{Membership, Session};
use crate::domain::turns::{self, NewSession, PlayOutcome};
use crate::domain::{Card, CardId, CardKind, CardLocation, Color, PlayerId};
use crate::errors::domain::DomainError;

/// Open a waiting session with the given player bounds.
pub fn waiting_session(founder: PlayerId, min: usize, max: usize, seed: u64) -> Session {
    turns::create_session(NewSession {
        code: "TEST01".to_string(),
        founder,
        min_players: min,
        max_players: max,
        opening_hand_size: OPENING_HAND_SIZE,
        seed,
    })
    .expect("valid session parameters")
}

/// Waiting session with every player active and the unshuffled deck in the
/// draw pile; nothing dealt.
pub fn session_with_cards(players: &[PlayerId], seed: u64) -> Session {
    let mut session = waiting_session(players[0], 2, 4, seed);
    session.memberships = players
        .iter()
        .enumerate()
        .map(|(order, &p)| Membership::new(p, order))
        .collect();
    session.cards = build_deck();
    session.draw_pile = session.cards.iter().map(|c| c.id).collect::<Vec<CardId>>();
    session
}

/// Started session: all `players` joined in order, hands dealt, top card up.
pub fn session_in_progress(players: &[PlayerId], seed: u64) -> Session {
    let mut session = waiting_session(players[0], players.len(), players.len(), seed);
    for &p in &players[1..] {
        turns::join(&mut session, p).expect("join succeeds");
    }
    session
}

/// Index in the draw pile of a card matching `kind` and `color`. A match
/// held in some hand is swapped with the draw pile's next card first, so
/// hand sizes are preserved.
fn locate_in_draw_pile(session: &mut Session, kind: CardKind, color: Color) -> usize {
    let is_match = |c: &Card| c.kind == kind && c.color == color;
    if let Some(pos) = session
        .draw_pile
        .iter()
        .position(|&id| is_match(&session.cards[id as usize]))
    {
        return pos;
    }
    let wanted = session
        .cards
        .iter()
        .find(|c| is_match(c) && matches!(c.location, CardLocation::InHand { .. }))
        .map(|c| c.id)
        .expect("matching card in draw pile or a hand");
    let CardLocation::InHand { owner, position } = session.cards[wanted as usize].location else {
        unreachable!()
    };
    let member = session.membership_index(owner).expect("owner");
    let pos = session.draw_pile.len() - 1;
    let replacement = session.draw_pile[pos];
    session.memberships[member].hand[position] = replacement;
    session.cards[replacement as usize].location = CardLocation::InHand { owner, position };
    session.draw_pile[pos] = wanted;
    session.cards[wanted as usize].location = CardLocation::DrawPile;
    pos
}

/// Move a card matching `kind` and `color` into `player`'s hand.
pub fn give_card(session: &mut Session, player: PlayerId, kind: CardKind, color: Color) -> CardId {
    let pos = locate_in_draw_pile(session, kind, color);
    let id = session.draw_pile.remove(pos);
    session.draw_pile.push(id);
    let member = session.membership_index(player).expect("member");
    draw(session, member, 1).expect("draw succeeds");
    id
}

/// Put a card matching `kind` and `color` on top of the discard pile.
pub fn set_top(session: &mut Session, kind: CardKind, color: Color) -> CardId {
    let pos = locate_in_draw_pile(session, kind, color);
    let id = session.draw_pile.remove(pos);
    place_on_discard(session, id);
    id
}

/// Return all but `keep` cards of `player`'s hand to the bottom of the draw pile.
pub fn trim_hand(session: &mut Session, player: PlayerId, keep: usize) {
    let member = session.membership_index(player).expect("member");
    while session.memberships[member].hand.len() > keep {
        let id = session.memberships[member].hand[0];
        remove_from_hand(session, member, id);
        session.draw_pile.insert(0, id);
        session.cards[id as usize].location = CardLocation::DrawPile;
    }
}

/// Move every draw-pile card into `player`'s hand.
pub fn drain_draw_pile(session: &mut Session, player: PlayerId) {
    let member = session.membership_index(player).expect("member");
    let count = session.draw_pile.len();
    if count > 0 {
        draw(session, member, count).expect("draw succeeds");
    }
}

/// Take the current player's turn: play the `choice`-th playable card
/// (picking a color for wilds) or draw when nothing is playable.
/// Returns the play outcome, or `None` for a draw.
pub fn bot_turn(session: &mut Session, choice: usize) -> Result<Option<PlayOutcome>, DomainError> {
    let player = session.current_player().expect("game in progress");
    let top = *session.top_card().expect("top card");
    let playable = playable_cards(session.hand(player), &top);
    if playable.is_empty() {
        return turns::draw_card(session, player).map(|_| None);
    }
    let card = playable[choice % playable.len()];
    let color = card
        .kind
        .is_wild()
        .then(|| Color::PLAYABLE[choice % Color::PLAYABLE.len()]);
    turns::play_card(session, player, card.id, color).map(Some)
}
