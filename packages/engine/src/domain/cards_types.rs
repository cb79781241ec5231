//! Core card-related types: Card, CardKind, Color, CardLocation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque account reference owned by the surrounding player service.
pub type PlayerId = i64;

/// Index into a session's card table (0..108).
pub type CardId = u32;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    /// Printed color of wild cards; never a legal chosen color.
    Wild,
}

impl Color {
    /// The four colors a wild card may be declared as.
    pub const PLAYABLE: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Yellow => "YELLOW",
            Color::Wild => "WILD",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a card does. The face value only exists for number cards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "number", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardKind {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl CardKind {
    pub const fn is_wild(&self) -> bool {
        matches!(self, CardKind::Wild | CardKind::WildDrawFour)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CardKind::Number(_) => "NUMBER",
            CardKind::Skip => "SKIP",
            CardKind::Reverse => "REVERSE",
            CardKind::DrawTwo => "DRAW_TWO",
            CardKind::Wild => "WILD",
            CardKind::WildDrawFour => "WILD_DRAW_FOUR",
        }
    }
}

/// Where a card currently sits. Every card has exactly one location.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardLocation {
    DrawPile,
    /// The current play target.
    DiscardTop,
    /// Played earlier; eligible for reshuffling.
    Discard,
    InHand { owner: PlayerId, position: usize },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    /// Printed color, or the chosen color once a wild card has been played.
    pub color: Color,
    pub location: CardLocation,
}

impl Card {
    pub const fn new(id: CardId, kind: CardKind, color: Color) -> Self {
        Self {
            id,
            kind,
            color,
            location: CardLocation::DrawPile,
        }
    }

    pub const fn number(&self) -> Option<u8> {
        match self.kind {
            CardKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_held_by(&self, player: PlayerId) -> bool {
        matches!(self.location, CardLocation::InHand { owner, .. } if owner == player)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CardKind::Number(n) => write!(f, "{} {n}", self.color),
            CardKind::Wild | CardKind::WildDrawFour => {
                f.write_str(&self.kind.as_str().replace('_', " "))?;
                if self.color != Color::Wild {
                    write!(f, " ({})", self.color)?;
                }
                Ok(())
            }
            kind => write!(f, "{} {}", self.color, kind.as_str().replace('_', " ")),
        }
    }
}
