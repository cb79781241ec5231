//! Public snapshot API for observing a session without exposing internals.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::rules::{hand_points, playable_cards};
use crate::domain::state::{Direction, Membership, Seat, Session, SessionStatus};
use crate::domain::{Card, CardId, PlayerId};

/// Public info about one membership. `hand` is only filled for the viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub player_id: PlayerId,
    pub join_order: usize,
    pub active: bool,
    pub seat: Option<Seat>,
    pub hand_size: usize,
    pub declared_low_hand: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
    /// Remaining-hand points, reported once the game is finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_points: Option<u32>,
}

/// Consistent view of a session at one event sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub code: String,
    pub status: SessionStatus,
    pub min_players: usize,
    pub max_players: usize,
    pub founder: PlayerId,
    pub members: Vec<MemberView>,
    pub current_player_index: Seat,
    pub current_player: Option<PlayerId>,
    pub direction: Direction,
    pub top_card: Option<Card>,
    pub draw_pile_size: usize,
    pub discard_size: usize,
    pub winner: Option<PlayerId>,
    /// Sum of the other members' hand points once a winner exists.
    pub winner_score: Option<u32>,
    pub last_sequence: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    pub viewer: Option<PlayerId>,
    /// Ids of the viewer's playable cards when it is the viewer's turn.
    pub playable: Vec<CardId>,
}

impl SessionSnapshot {
    pub fn member(&self, player: PlayerId) -> Option<&MemberView> {
        self.members.iter().find(|m| m.player_id == player)
    }

    /// The viewer's own hand, empty when there is no viewer.
    pub fn viewer_hand(&self) -> &[Card] {
        self.viewer
            .and_then(|v| self.member(v))
            .and_then(|m| m.hand.as_deref())
            .unwrap_or(&[])
    }
}

fn member_points(session: &Session, m: &Membership) -> u32 {
    hand_points(m.hand.iter().filter_map(|&id| session.card(id)))
}

/// Produce a snapshot; `viewer` sees their own hand and playable cards.
pub fn snapshot(session: &Session, viewer: Option<PlayerId>) -> SessionSnapshot {
    let finished = session.status() == SessionStatus::Finished;

    let members: Vec<MemberView> = session
        .memberships()
        .iter()
        .map(|m| {
            let is_viewer = viewer == Some(m.player_id);
            MemberView {
                player_id: m.player_id,
                join_order: m.join_order,
                active: m.active,
                seat: session.seat_of(m.player_id),
                hand_size: m.hand_size(),
                declared_low_hand: m.declared_low_hand,
                hand: is_viewer
                    .then(|| session.hand(m.player_id).into_iter().copied().collect()),
                hand_points: finished.then(|| member_points(session, m)),
            }
        })
        .collect();

    let winner_score = session.winner().filter(|_| finished).map(|winner| {
        session
            .memberships()
            .iter()
            .filter(|m| m.player_id != winner)
            .map(|m| member_points(session, m))
            .sum()
    });

    let current_player = session.current_player();
    let playable = match (viewer, session.top_card()) {
        (Some(v), Some(top)) if current_player == Some(v) => {
            playable_cards(session.hand(v), top)
                .into_iter()
                .map(|c| c.id)
                .collect()
        }
        _ => Vec::new(),
    };

    SessionSnapshot {
        code: session.code().to_string(),
        status: session.status(),
        min_players: session.min_players(),
        max_players: session.max_players(),
        founder: session.founder(),
        members,
        current_player_index: session.current_player_index(),
        current_player,
        direction: session.direction(),
        top_card: session.top_card().copied(),
        draw_pile_size: session.draw_pile_size(),
        discard_size: session.discard_size(),
        winner: session.winner(),
        winner_score,
        last_sequence: session.events().last_sequence(),
        created_at: session.created_at(),
        started_at: session.started_at(),
        finished_at: session.finished_at(),
        viewer,
        playable,
    }
}
