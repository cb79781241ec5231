/// Property-based tests for card legality rules
use proptest::prelude::*;

use crate::domain::rules::{has_playable_card, is_playable, playable_cards};
use crate::domain::{test_gens, test_prelude, Color};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: wild cards are playable on every top card.
    #[test]
    fn prop_wild_always_playable(
        candidate in test_gens::card(),
        top in test_gens::top_card(),
    ) {
        if candidate.kind.is_wild() {
            prop_assert!(is_playable(&candidate, &top));
        }
    }

    /// Property: a colored card matching the top's color is always playable,
    /// and a colored card is only playable when color or kind matches.
    #[test]
    fn prop_colored_cards_match_color_or_kind(
        candidate in test_gens::card(),
        top in test_gens::top_card(),
    ) {
        prop_assume!(!candidate.kind.is_wild());
        let expected = candidate.color == top.color || candidate.kind == top.kind;
        prop_assert_eq!(is_playable(&candidate, &top), expected,
            "{} on {}", candidate, top);
    }

    /// Property: playable_cards is exactly the filtered hand, in order,
    /// and has_playable_card agrees with it.
    #[test]
    fn prop_playable_cards_filters_hand(
        hand in test_gens::hand(12),
        top in test_gens::top_card(),
    ) {
        let playable = playable_cards(&hand, &top);
        let expected: Vec<_> = hand.iter().copied().filter(|c| is_playable(c, &top)).collect();
        prop_assert_eq!(&playable, &expected);
        prop_assert_eq!(has_playable_card(&hand, &top), !playable.is_empty());
    }

    /// Property: a top card never carries the Wild color.
    #[test]
    fn prop_top_card_has_playable_color(top in test_gens::top_card()) {
        prop_assert_ne!(top.color, Color::Wild);
    }
}
