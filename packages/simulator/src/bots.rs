//! Simple bot policies choosing a move from a player's snapshot.

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uno_engine::domain::rules::point_value;
use uno_engine::{Card, CardId, Color, SessionSnapshot};

use crate::types::BotKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAction {
    Play { card: CardId, color: Option<Color> },
    Draw,
}

pub trait Bot {
    /// Choose a move given the bot's own snapshot on its turn.
    fn choose(&mut self, view: &SessionSnapshot) -> BotAction;
}

pub fn create_bot(kind: BotKind, seed: u64) -> Box<dyn Bot> {
    match kind {
        BotKind::Random => Box::new(RandomBot {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }),
        BotKind::Greedy => Box::new(GreedyBot),
        BotKind::Cautious => Box::new(CautiousBot),
    }
}

fn playable(view: &SessionSnapshot) -> Vec<Card> {
    view.viewer_hand()
        .iter()
        .filter(|c| view.playable.contains(&c.id))
        .copied()
        .collect()
}

/// Color held most often among the hand's colored cards.
fn dominant_color(hand: &[Card]) -> Color {
    Color::PLAYABLE
        .into_iter()
        .max_by_key(|color| hand.iter().filter(|c| c.color == *color).count())
        .unwrap_or(Color::Red)
}

fn play(card: &Card, hand: &[Card]) -> BotAction {
    BotAction::Play {
        card: card.id,
        color: card.kind.is_wild().then(|| dominant_color(hand)),
    }
}

struct RandomBot {
    rng: ChaCha8Rng,
}

impl Bot for RandomBot {
    fn choose(&mut self, view: &SessionSnapshot) -> BotAction {
        let options = playable(view);
        match options.choose(&mut self.rng) {
            Some(card) => BotAction::Play {
                card: card.id,
                color: card
                    .kind
                    .is_wild()
                    .then(|| *Color::PLAYABLE.choose(&mut self.rng).unwrap_or(&Color::Red)),
            },
            None => BotAction::Draw,
        }
    }
}

struct GreedyBot;

impl Bot for GreedyBot {
    fn choose(&mut self, view: &SessionSnapshot) -> BotAction {
        playable(view)
            .iter()
            .max_by_key(|c| point_value(c))
            .map(|card| play(card, view.viewer_hand()))
            .unwrap_or(BotAction::Draw)
    }
}

struct CautiousBot;

impl Bot for CautiousBot {
    fn choose(&mut self, view: &SessionSnapshot) -> BotAction {
        playable(view)
            .first()
            .map(|card| play(card, view.viewer_hand()))
            .unwrap_or(BotAction::Draw)
    }
}
