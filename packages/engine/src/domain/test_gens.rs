// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::{Card, CardKind, Color};

/// Any color, including `Wild`.
pub fn color() -> impl Strategy<Value = Color> {
    prop_oneof![
        Just(Color::Red),
        Just(Color::Blue),
        Just(Color::Green),
        Just(Color::Yellow),
        Just(Color::Wild),
    ]
}

/// One of the four playable colors.
pub fn playable_color() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::PLAYABLE.to_vec())
}

/// A colored (non-wild) card kind.
pub fn colored_kind() -> impl Strategy<Value = CardKind> {
    prop_oneof![
        4 => (0u8..=9).prop_map(CardKind::Number),
        1 => Just(CardKind::Skip),
        1 => Just(CardKind::Reverse),
        1 => Just(CardKind::DrawTwo),
    ]
}

/// A card as it could appear in a deck, with id 0.
pub fn card() -> impl Strategy<Value = Card> {
    prop_oneof![
        5 => (colored_kind(), playable_color())
            .prop_map(|(kind, color)| Card::new(0, kind, color)),
        1 => prop_oneof![Just(CardKind::Wild), Just(CardKind::WildDrawFour)]
            .prop_map(|kind| Card::new(0, kind, Color::Wild)),
    ]
}

/// A discard-top card: wilds carry a chosen playable color.
pub fn top_card() -> impl Strategy<Value = Card> {
    (card(), playable_color()).prop_map(|(mut c, chosen)| {
        if c.kind.is_wild() {
            c.color = chosen;
        }
        c
    })
}

/// A hand of up to `max` cards with distinct ids.
pub fn hand(max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card(), 0..=max).prop_map(|cards| {
        cards
            .into_iter()
            .enumerate()
            .map(|(i, c)| Card::new(i as u32 + 1, c.kind, c.color))
            .collect()
    })
}

pub fn player_count() -> impl Strategy<Value = usize> {
    2usize..=4
}

/// Bot choices driving a random game, one per turn.
pub fn choices(max_turns: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..64, 1..=max_turns)
}
