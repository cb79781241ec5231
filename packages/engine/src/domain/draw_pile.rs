//! Draw pile manager: dealing, drawing and reshuffling.
//!
//! Cards move only through the helpers here, which keep each card's
//! `location` in step with the pile or hand listing it.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::events::EventKind;
use crate::domain::rules::is_legal_opening_card;
use crate::domain::seed_derivation::derive_shuffle_seed;
use crate::domain::state::Session;
use crate::domain::{CardId, CardLocation, Color};
use crate::errors::domain::{DomainError, ExhaustedKind};

/// Shuffle `ids` with the session's next derived seed.
fn shuffle_ids(session: &mut Session, ids: &mut [CardId]) {
    let seed = derive_shuffle_seed(session.seed, session.shuffle_count);
    session.shuffle_count += 1;
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    ids.shuffle(&mut rng);
}

/// Shuffle the whole draw pile in place.
pub(crate) fn shuffle_draw_pile(session: &mut Session) {
    let mut pile = std::mem::take(&mut session.draw_pile);
    shuffle_ids(session, &mut pile);
    session.draw_pile = pile;
}

/// Rewrite `position` for every card in a member's hand.
fn reindex_hand(session: &mut Session, member: usize) {
    let owner = session.memberships[member].player_id;
    for (position, &id) in session.memberships[member].hand.iter().enumerate() {
        session.cards[id as usize].location = CardLocation::InHand { owner, position };
    }
}

/// Move the next draw-pile card to the end of a member's hand.
fn take_into_hand(session: &mut Session, member: usize) -> Option<CardId> {
    let id = session.draw_pile.pop()?;
    let m = &mut session.memberships[member];
    let position = m.hand.len();
    m.hand.push(id);
    session.cards[id as usize].location = CardLocation::InHand {
        owner: m.player_id,
        position,
    };
    Some(id)
}

/// Remove a card from a member's hand, closing the gap.
pub(crate) fn remove_from_hand(session: &mut Session, member: usize, id: CardId) -> bool {
    let hand = &mut session.memberships[member].hand;
    let Some(pos) = hand.iter().position(|&c| c == id) else {
        return false;
    };
    hand.remove(pos);
    reindex_hand(session, member);
    true
}

/// Put a card on top of the discard pile, demoting the prior top.
pub(crate) fn place_on_discard(session: &mut Session, id: CardId) {
    if let Some(&prev) = session.discard.last() {
        session.cards[prev as usize].location = CardLocation::Discard;
    }
    session.discard.push(id);
    session.cards[id as usize].location = CardLocation::DiscardTop;
}

/// Cards a draw could obtain: the draw pile plus every discard below the top.
pub fn available_supply(session: &Session) -> usize {
    session.draw_pile.len() + session.discard.len().saturating_sub(1)
}

/// Deal `hand_size` cards to each active member in rotation order.
pub(crate) fn deal_opening_hands(session: &mut Session, hand_size: usize) -> Result<(), DomainError> {
    let order = session.active_order();
    let needed = hand_size * order.len();
    if needed > session.draw_pile.len() {
        return Err(DomainError::exhausted(
            ExhaustedKind::InsufficientCards,
            format!(
                "{needed} cards needed for {} players, {} available",
                order.len(),
                session.draw_pile.len()
            ),
        ));
    }
    for member in order {
        for _ in 0..hand_size {
            take_into_hand(session, member);
        }
    }
    Ok(())
}

/// Reveal the first legal opening card remaining in the draw pile.
///
/// Falls back to the next card to be drawn when the pile holds no number
/// card. Returns the revealed card's id.
pub(crate) fn reveal_opening_card(session: &mut Session) -> Result<CardId, DomainError> {
    let pos = session
        .draw_pile
        .iter()
        .rposition(|&id| is_legal_opening_card(&session.cards[id as usize]))
        .or_else(|| session.draw_pile.len().checked_sub(1))
        .ok_or_else(|| {
            DomainError::exhausted(
                ExhaustedKind::InsufficientCards,
                "no card left to open the discard pile",
            )
        })?;
    let id = session.draw_pile.remove(pos);
    place_on_discard(session, id);
    Ok(id)
}

/// Move every discard card except the top back into the draw pile, shuffled,
/// beneath any cards still waiting there. Returns how many cards moved.
pub(crate) fn reshuffle(session: &mut Session) -> usize {
    let Some(top) = session.discard.pop() else {
        return 0;
    };
    let mut returned = std::mem::replace(&mut session.discard, vec![top]);
    for &id in &returned {
        let card = &mut session.cards[id as usize];
        card.location = CardLocation::DrawPile;
        if card.kind.is_wild() {
            card.color = Color::Wild;
        }
    }
    let count = returned.len();
    shuffle_ids(session, &mut returned);
    returned.append(&mut session.draw_pile);
    session.draw_pile = returned;
    session
        .events
        .append(EventKind::DeckReshuffled { card_count: count }, None);
    count
}

/// Move `count` cards from the draw pile into a member's hand, reshuffling
/// the discard pile first when the draw pile runs short.
///
/// Fails with `DeckExhausted`, leaving the session untouched, when the draw
/// pile and reshufflable discards together hold fewer than `count` cards.
pub(crate) fn draw(
    session: &mut Session,
    member: usize,
    count: usize,
) -> Result<Vec<CardId>, DomainError> {
    if available_supply(session) < count {
        return Err(DomainError::exhausted(
            ExhaustedKind::DeckExhausted,
            format!(
                "{count} cards requested, {} available",
                available_supply(session)
            ),
        ));
    }
    if session.draw_pile.len() < count {
        reshuffle(session);
    }
    let drawn: Vec<CardId> = (0..count)
        .filter_map(|_| take_into_hand(session, member))
        .collect();
    Ok(drawn)
}
