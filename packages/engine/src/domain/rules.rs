//! Card legality rules: stateless predicates over card values.

use crate::domain::{Card, CardKind, Color};

pub const DECK_SIZE: usize = 108;
pub const OPENING_HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Whether `candidate` may be played on `top`.
pub fn is_playable(candidate: &Card, top: &Card) -> bool {
    if candidate.kind.is_wild() {
        return true;
    }
    if candidate.color == top.color {
        return true;
    }
    match (candidate.kind, top.kind) {
        (CardKind::Number(a), CardKind::Number(b)) => a == b,
        (a, b) => a == b,
    }
}

pub fn requires_color_choice(card: &Card) -> bool {
    card.kind.is_wild()
}

pub fn is_valid_color_choice(color: Color) -> bool {
    color != Color::Wild
}

pub fn forced_draw_count(card: &Card) -> usize {
    match card.kind {
        CardKind::DrawTwo => 2,
        CardKind::WildDrawFour => 4,
        _ => 0,
    }
}

/// The next player's turn is consumed.
pub fn causes_skip(card: &Card) -> bool {
    matches!(
        card.kind,
        CardKind::Skip | CardKind::DrawTwo | CardKind::WildDrawFour
    )
}

pub fn causes_reverse(card: &Card) -> bool {
    card.kind == CardKind::Reverse
}

/// Only number cards may start the discard pile.
pub fn is_legal_opening_card(card: &Card) -> bool {
    matches!(card.kind, CardKind::Number(_))
}

pub fn point_value(card: &Card) -> u32 {
    match card.kind {
        CardKind::Number(n) => u32::from(n),
        CardKind::Skip | CardKind::Reverse | CardKind::DrawTwo => 20,
        CardKind::Wild | CardKind::WildDrawFour => 50,
    }
}

pub fn hand_points<'a>(hand: impl IntoIterator<Item = &'a Card>) -> u32 {
    hand.into_iter().map(point_value).sum()
}

pub fn has_playable_card<'a>(hand: impl IntoIterator<Item = &'a Card>, top: &Card) -> bool {
    hand.into_iter().any(|c| is_playable(c, top))
}

/// Cards from `hand` that may be played on `top`, in hand order.
pub fn playable_cards<'a>(hand: impl IntoIterator<Item = &'a Card>, top: &Card) -> Vec<Card> {
    hand.into_iter()
        .filter(|c| is_playable(c, top))
        .copied()
        .collect()
}
