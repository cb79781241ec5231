//! Card catalog: the canonical 108-card deck.
//!
//! Construction is deterministic; shuffling belongs to the draw pile.

use crate::domain::rules::DECK_SIZE;
use crate::domain::{Card, CardId, CardKind, Color};

/// Build the canonical deck in catalog order, every card in the draw pile.
///
/// Per color: one 0, two each of 1..=9, two Skip, two Reverse, two Draw Two.
/// Then four Wild and four Wild Draw Four. Card ids are assigned in order, so
/// `deck[id].id == id`.
pub fn build_deck() -> Vec<Card> {
    let mut kinds: Vec<(CardKind, Color)> = Vec::with_capacity(DECK_SIZE);
    for color in Color::PLAYABLE {
        kinds.push((CardKind::Number(0), color));
        for n in 1..=9 {
            kinds.push((CardKind::Number(n), color));
            kinds.push((CardKind::Number(n), color));
        }
        for action in [CardKind::Skip, CardKind::Reverse, CardKind::DrawTwo] {
            kinds.push((action, color));
            kinds.push((action, color));
        }
    }
    for _ in 0..4 {
        kinds.push((CardKind::Wild, Color::Wild));
        kinds.push((CardKind::WildDrawFour, Color::Wild));
    }

    let deck: Vec<Card> = kinds
        .into_iter()
        .enumerate()
        .map(|(id, (kind, color))| Card::new(id as CardId, kind, color))
        .collect();
    debug_assert_eq!(deck.len(), DECK_SIZE, "catalog must hold {DECK_SIZE} cards");
    deck
}
