//! Session aggregate: memberships, cards, piles and turn pointer.
//!
//! The session owns every card by value. Back-references (card owner, member
//! seat) are plain ids resolved through lookups on the session.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::events::EventLog;
use crate::domain::rules::DECK_SIZE;
use crate::domain::{Card, CardId, CardLocation, PlayerId};
use crate::errors::domain::{DomainError, NotFoundKind};

/// Index into the active-member sequence.
pub type Seat = usize;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    WaitingForPlayers,
    InProgress,
    Finished,
    Cancelled,
}

impl SessionStatus {
    /// Terminal states accept no further gameplay.
    pub const fn is_closed(&self) -> bool {
        matches!(self, SessionStatus::Finished | SessionStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Clockwise direction is positive (+1), counter-clockwise negative (-1).
    pub const fn delta(&self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub const fn reversed(&self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Seat `delta` steps away from `seat` in a rotation of `len` seats.
#[inline]
pub fn seat_offset(seat: Seat, delta: isize, len: usize) -> Seat {
    debug_assert!(len > 0, "rotation needs at least one seat");
    (seat as isize + delta).rem_euclid(len as isize) as Seat
}

/// A player's participation record. Created on join, never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub player_id: PlayerId,
    /// Stable rotation order, 0-based.
    pub join_order: usize,
    pub active: bool,
    /// Card ids in hand order; a card's `position` is its index here.
    pub(crate) hand: Vec<CardId>,
    pub declared_low_hand: bool,
}

impl Membership {
    pub(crate) fn new(player_id: PlayerId, join_order: usize) -> Self {
        Self {
            player_id,
            join_order,
            active: true,
            hand: Vec::new(),
            declared_low_hand: false,
        }
    }

    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    pub fn hand_ids(&self) -> &[CardId] {
        &self.hand
    }

    /// One card left and the declaration not yet made.
    pub fn should_declare_low_hand(&self) -> bool {
        self.hand.len() == 1 && !self.declared_low_hand
    }
}

/// Aggregate root for one game instance.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) code: String,
    pub(crate) status: SessionStatus,
    pub(crate) min_players: usize,
    pub(crate) max_players: usize,
    pub(crate) opening_hand_size: usize,
    pub(crate) founder: PlayerId,
    /// In join sequence; never shrinks.
    pub(crate) memberships: Vec<Membership>,
    pub(crate) current_player_index: Seat,
    pub(crate) direction: Direction,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) started_at: Option<OffsetDateTime>,
    pub(crate) finished_at: Option<OffsetDateTime>,
    /// Card table indexed by `CardId`; empty until the game starts.
    pub(crate) cards: Vec<Card>,
    /// Face-down stock; the last element is drawn next.
    pub(crate) draw_pile: Vec<CardId>,
    /// Played cards; the last element is the top card.
    pub(crate) discard: Vec<CardId>,
    pub(crate) seed: u64,
    pub(crate) shuffle_count: u32,
    pub(crate) events: EventLog,
}

impl Session {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn min_players(&self) -> usize {
        self.min_players
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn opening_hand_size(&self) -> usize {
        self.opening_hand_size
    }

    pub fn founder(&self) -> PlayerId {
        self.founder
    }

    pub fn current_player_index(&self) -> Seat {
        self.current_player_index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<OffsetDateTime> {
        self.finished_at
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// All memberships in join sequence, including inactive ones.
    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    /// Membership indices of active members in rotation order.
    pub(crate) fn active_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.memberships.len())
            .filter(|&i| self.memberships[i].active)
            .collect();
        order.sort_by_key(|&i| (self.memberships[i].join_order, i));
        order
    }

    /// Active members in rotation order; seat `n` is element `n`.
    pub fn active_members(&self) -> Vec<&Membership> {
        self.active_order()
            .into_iter()
            .map(|i| &self.memberships[i])
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.memberships.iter().filter(|m| m.active).count()
    }

    pub(crate) fn membership_index(&self, player: PlayerId) -> Option<usize> {
        self.memberships.iter().position(|m| m.player_id == player)
    }

    pub fn membership(&self, player: PlayerId) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.player_id == player)
    }

    /// Membership index of an active member, or `NotFound(Player)`.
    pub(crate) fn require_active_member(&self, player: PlayerId) -> Result<usize, DomainError> {
        self.membership_index(player)
            .filter(|&i| self.memberships[i].active)
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Player,
                    format!("player {player} has no active membership in {}", self.code),
                )
            })
    }

    /// Seat of an active member in the rotation.
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        self.active_order()
            .into_iter()
            .position(|i| self.memberships[i].player_id == player)
    }

    /// Membership index of the member at `seat`.
    pub(crate) fn member_at_seat(&self, seat: Seat) -> Option<usize> {
        self.active_order().get(seat).copied()
    }

    /// Player whose turn it is; `None` unless the game is in progress.
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        self.member_at_seat(self.current_player_index)
            .map(|i| self.memberships[i].player_id)
    }

    /// Seat one step from the current seat in the current direction.
    pub fn next_seat(&self) -> Seat {
        let len = self.active_count().max(1);
        seat_offset(self.current_player_index, self.direction.delta(), len)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id as usize)
    }

    pub(crate) fn require_card(&self, id: CardId) -> Result<&Card, DomainError> {
        self.card(id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Card, format!("card {id} in {}", self.code))
        })
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.discard.last().and_then(|&id| self.card(id))
    }

    /// Cards in the player's hand, in hand order.
    pub fn hand(&self, player: PlayerId) -> Vec<&Card> {
        self.membership(player)
            .map(|m| m.hand.iter().filter_map(|&id| self.card(id)).collect())
            .unwrap_or_default()
    }

    pub fn draw_pile_size(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_size(&self) -> usize {
        self.discard.len()
    }

    /// Verify card conservation and turn-pointer validity.
    ///
    /// Every dealt session holds exactly 108 cards, each in exactly one
    /// location that agrees with the pile or hand listing it.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if self.cards.is_empty() {
            if self.started_at.is_some() {
                return Err(DomainError::validation_other(
                    "Invariant violated: started session has no cards",
                ));
            }
            return Ok(());
        }
        if self.cards.len() != DECK_SIZE {
            return Err(DomainError::validation_other(format!(
                "Invariant violated: {} cards in table",
                self.cards.len()
            )));
        }

        let mut seen = vec![false; DECK_SIZE];
        let mut claim = |id: CardId, expected: CardLocation| -> Result<(), DomainError> {
            let card = self.require_card(id)?;
            let slot = &mut seen[id as usize];
            if *slot {
                return Err(DomainError::validation_other(format!(
                    "Invariant violated: card {id} listed twice"
                )));
            }
            *slot = true;
            if card.location != expected {
                return Err(DomainError::validation_other(format!(
                    "Invariant violated: card {id} at {:?}, listed at {expected:?}",
                    card.location
                )));
            }
            Ok(())
        };

        for &id in &self.draw_pile {
            claim(id, CardLocation::DrawPile)?;
        }
        let top_index = self.discard.len().checked_sub(1);
        for (i, &id) in self.discard.iter().enumerate() {
            let expected = if Some(i) == top_index {
                CardLocation::DiscardTop
            } else {
                CardLocation::Discard
            };
            claim(id, expected)?;
        }
        for m in &self.memberships {
            for (position, &id) in m.hand.iter().enumerate() {
                claim(
                    id,
                    CardLocation::InHand {
                        owner: m.player_id,
                        position,
                    },
                )?;
            }
        }
        if seen.iter().any(|s| !s) {
            return Err(DomainError::validation_other(
                "Invariant violated: card missing from every location",
            ));
        }

        if self.status == SessionStatus::InProgress {
            if top_index.is_none() {
                return Err(DomainError::validation_other(
                    "Invariant violated: no top card while in progress",
                ));
            }
            if self.current_player_index >= self.active_count() {
                return Err(DomainError::validation_other(format!(
                    "Invariant violated: current seat {} outside {} active members",
                    self.current_player_index,
                    self.active_count()
                )));
            }
        }
        Ok(())
    }
}
