//! Per-session append-only event log.
//!
//! Sequence numbers start at 1 and never skip, so a consumer that remembers
//! the last sequence it saw can detect and repair gaps with `read_from`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::state::Direction;
use crate::domain::{Card, Color, PlayerId};

/// What changed, with its small structured payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SessionCreated {
        code: String,
        min_players: usize,
        max_players: usize,
    },
    PlayerJoined {
        join_order: usize,
    },
    GameStarted {
        player_count: usize,
    },
    CardPlayed {
        card: Card,
        chosen_color: Option<Color>,
    },
    DirectionReversed {
        direction: Direction,
    },
    ForcedDraw {
        count: usize,
    },
    CardDrawn {
        count: usize,
    },
    DeckReshuffled {
        card_count: usize,
    },
    UnoCalled,
    PlayerLeft,
    GameWon {
        winner: PlayerId,
    },
    GameEndedInsufficientPlayers {
        winner: Option<PlayerId>,
    },
    SessionCancelled,
}

impl EventKind {
    /// Wire tag of the event type.
    pub const fn type_tag(&self) -> &'static str {
        match self {
            EventKind::SessionCreated { .. } => "SESSION_CREATED",
            EventKind::PlayerJoined { .. } => "PLAYER_JOINED",
            EventKind::GameStarted { .. } => "GAME_STARTED",
            EventKind::CardPlayed { .. } => "CARD_PLAYED",
            EventKind::DirectionReversed { .. } => "DIRECTION_REVERSED",
            EventKind::ForcedDraw { .. } => "FORCED_DRAW",
            EventKind::CardDrawn { .. } => "CARD_DRAWN",
            EventKind::DeckReshuffled { .. } => "DECK_RESHUFFLED",
            EventKind::UnoCalled => "UNO_CALLED",
            EventKind::PlayerLeft => "PLAYER_LEFT",
            EventKind::GameWon { .. } => "GAME_WON",
            EventKind::GameEndedInsufficientPlayers { .. } => "GAME_ENDED_INSUFFICIENT_PLAYERS",
            EventKind::SessionCancelled => "SESSION_CANCELLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub sequence: u64,
    #[serde(flatten)]
    pub kind: EventKind,
    pub actor: Option<PlayerId>,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// Events per sealed chunk.
const CHUNK_LEN: usize = 64;

/// Full chunks are sealed behind an `Arc` and shared between clones, so
/// cloning a log copies at most `CHUNK_LEN` events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    sealed: Vec<Arc<[Event]>>,
    tail: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event with the next sequence number.
    pub fn append(&mut self, kind: EventKind, actor: Option<PlayerId>) -> &Event {
        let sequence = self.last_sequence() + 1;
        if self.tail.len() == CHUNK_LEN {
            let full = std::mem::take(&mut self.tail);
            self.sealed.push(Arc::from(full));
        }
        self.tail.push(Event {
            sequence,
            kind,
            actor,
            at: OffsetDateTime::now_utc(),
        });
        &self.tail[self.tail.len() - 1]
    }

    /// Events with a sequence number greater than `after`, in order.
    pub fn read_from(&self, after: u64) -> Vec<Event> {
        let start = usize::try_from(after).unwrap_or(usize::MAX);
        let first_chunk = (start / CHUNK_LEN).min(self.sealed.len());
        self.sealed[first_chunk..]
            .iter()
            .flat_map(|chunk| chunk.iter())
            .chain(self.tail.iter())
            .skip(start - first_chunk * CHUNK_LEN)
            .cloned()
            .collect()
    }

    /// Sequence number of the newest event, 0 when empty.
    pub fn last_sequence(&self) -> u64 {
        self.len() as u64
    }

    pub fn len(&self) -> usize {
        self.sealed.len() * CHUNK_LEN + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sealed.is_empty() && self.tail.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.tail.last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Event> + '_ {
        self.sealed
            .iter()
            .flat_map(|chunk| chunk.iter())
            .chain(self.tail.iter())
    }
}
