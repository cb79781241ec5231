//! Turn engine: session lifecycle, turn order and forced effects.
//!
//! Every operation validates all of its preconditions before mutating, so a
//! returned error means the session was left exactly as it was.

use time::OffsetDateTime;

use crate::domain::deck::build_deck;
use crate::domain::draw_pile::{
    deal_opening_hands, draw, place_on_discard, remove_from_hand, reveal_opening_card,
    shuffle_draw_pile,
};
use crate::domain::events::{EventKind, EventLog};
use crate::domain::rules::{
    causes_reverse, causes_skip, forced_draw_count, is_playable, is_valid_color_choice,
    requires_color_choice, DECK_SIZE, MAX_PLAYERS, MIN_PLAYERS,
};
use crate::domain::state::{seat_offset, Direction, Membership, Seat, Session, SessionStatus};
use crate::domain::{Card, CardId, Color, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, ExhaustedKind, ValidationKind};

/// Parameters for opening a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub code: String,
    pub founder: PlayerId,
    pub min_players: usize,
    pub max_players: usize,
    pub opening_hand_size: usize,
    pub seed: u64,
}

/// What a successful `play_card` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    /// The card as it now lies on the discard pile (wilds carry the chosen color).
    pub card: Card,
    pub reversed: bool,
    /// Player forced to draw and how many cards they drew.
    pub forced_draw: Option<(PlayerId, usize)>,
    /// Player whose turn was consumed.
    pub skipped: Option<PlayerId>,
    /// Set when the play emptied the hand.
    pub winner: Option<PlayerId>,
}

/// Open a session in WAITING_FOR_PLAYERS with the founder as member #0.
pub fn create_session(params: NewSession) -> Result<Session, DomainError> {
    let NewSession {
        code,
        founder,
        min_players,
        max_players,
        opening_hand_size,
        seed,
    } = params;

    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&min_players)
        || !(MIN_PLAYERS..=MAX_PLAYERS).contains(&max_players)
        || min_players > max_players
    {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!(
                "player bounds must satisfy {MIN_PLAYERS} <= min ({min_players}) <= max ({max_players}) <= {MAX_PLAYERS}"
            ),
        ));
    }
    let needed = opening_hand_size
        .checked_mul(max_players)
        .and_then(|dealt| dealt.checked_add(1));
    if opening_hand_size == 0 || !matches!(needed, Some(n) if n <= DECK_SIZE) {
        return Err(DomainError::exhausted(
            ExhaustedKind::InsufficientCards,
            format!("{DECK_SIZE} cards cannot deal {opening_hand_size} to {max_players} players"),
        ));
    }

    let mut events = EventLog::new();
    events.append(
        EventKind::SessionCreated {
            code: code.clone(),
            min_players,
            max_players,
        },
        Some(founder),
    );

    Ok(Session {
        code,
        status: SessionStatus::WaitingForPlayers,
        min_players,
        max_players,
        opening_hand_size,
        founder,
        memberships: vec![Membership::new(founder, 0)],
        current_player_index: 0,
        direction: Direction::Clockwise,
        winner: None,
        created_at: OffsetDateTime::now_utc(),
        started_at: None,
        finished_at: None,
        cards: Vec::new(),
        draw_pile: Vec::new(),
        discard: Vec::new(),
        seed,
        shuffle_count: 0,
        events,
    })
}

/// Add a player to a waiting session, starting the game once the active
/// count reaches `min_players`.
pub fn join(session: &mut Session, player: PlayerId) -> Result<(), DomainError> {
    if session.status != SessionStatus::WaitingForPlayers {
        return Err(DomainError::validation(
            ValidationKind::SessionNotJoinable,
            format!("session {} is {:?}", session.code, session.status),
        ));
    }
    let active = session.active_count();
    if active >= session.max_players {
        return Err(DomainError::conflict(
            ConflictKind::SessionFull,
            format!("session {} already has {active} players", session.code),
        ));
    }
    let existing = session.membership_index(player);
    if existing.is_some_and(|i| session.memberships[i].active) {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyJoined,
            format!("player {player} already in session {}", session.code),
        ));
    }

    let join_order = active;
    match existing {
        Some(i) => {
            let m = &mut session.memberships[i];
            m.active = true;
            m.join_order = join_order;
            m.declared_low_hand = false;
        }
        None => session.memberships.push(Membership::new(player, join_order)),
    }
    session
        .events
        .append(EventKind::PlayerJoined { join_order }, Some(player));

    if session.active_count() >= session.min_players {
        start(session)?;
    }
    Ok(())
}

/// Build, shuffle and deal; reveal the opening card; first seat acts.
pub(crate) fn start(session: &mut Session) -> Result<(), DomainError> {
    let players = session.active_count();
    let hand_size = session.opening_hand_size;
    let needed = hand_size * players + 1;
    if needed > DECK_SIZE {
        return Err(DomainError::exhausted(
            ExhaustedKind::InsufficientCards,
            format!("{needed} cards needed, deck holds {DECK_SIZE}"),
        ));
    }

    session.cards = build_deck();
    session.draw_pile = session.cards.iter().map(|c| c.id).collect();
    session.discard.clear();
    shuffle_draw_pile(session);
    deal_opening_hands(session, hand_size)?;
    reveal_opening_card(session)?;

    session.status = SessionStatus::InProgress;
    session.started_at = Some(OffsetDateTime::now_utc());
    session.current_player_index = 0;
    session.direction = Direction::Clockwise;
    session.events.append(
        EventKind::GameStarted {
            player_count: players,
        },
        None,
    );
    Ok(())
}

/// Move the turn one seat in the current direction.
pub(crate) fn advance(session: &mut Session) {
    let len = session.active_count();
    if len == 0 {
        return;
    }
    session.current_player_index =
        seat_offset(session.current_player_index, session.direction.delta(), len);
}

fn require_in_progress(session: &Session) -> Result<(), DomainError> {
    if session.status != SessionStatus::InProgress {
        return Err(DomainError::validation(
            ValidationKind::GameNotInProgress,
            format!("session {} is {:?}", session.code, session.status),
        ));
    }
    Ok(())
}

/// Membership index of the acting player, who must hold the current seat.
fn require_turn(session: &Session, player: PlayerId) -> Result<usize, DomainError> {
    let member = session
        .member_at_seat(session.current_player_index)
        .ok_or_else(|| {
            DomainError::validation_other(format!(
                "Invariant violated: no member at seat {}",
                session.current_player_index
            ))
        })?;
    if session.memberships[member].player_id != player {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            format!(
                "player {} is to act, not {player}",
                session.memberships[member].player_id
            ),
        ));
    }
    Ok(member)
}

fn finish(session: &mut Session, winner: PlayerId) {
    session.status = SessionStatus::Finished;
    session.winner = Some(winner);
    session.finished_at = Some(OffsetDateTime::now_utc());
    session
        .events
        .append(EventKind::GameWon { winner }, Some(winner));
}

/// Play a card from the current player's hand and apply its forced effects.
pub fn play_card(
    session: &mut Session,
    player: PlayerId,
    card_id: CardId,
    chosen_color: Option<Color>,
) -> Result<PlayOutcome, DomainError> {
    require_in_progress(session)?;
    let member = require_turn(session, player)?;

    let card = *session.require_card(card_id)?;
    if !card.is_held_by(player) {
        return Err(DomainError::validation(
            ValidationKind::CardNotOwned,
            format!("card {card_id} is not in player {player}'s hand"),
        ));
    }
    let top = *session.top_card().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: no top card while in progress")
    })?;
    if !is_playable(&card, &top) {
        return Err(DomainError::validation(
            ValidationKind::IllegalMove,
            format!("{card} cannot be played on {top}"),
        ));
    }
    let declared_color = if requires_color_choice(&card) {
        match chosen_color {
            Some(color) if is_valid_color_choice(color) => Some(color),
            _ => {
                return Err(DomainError::validation(
                    ValidationKind::ColorChoiceRequired,
                    format!("{card} needs a red, blue, green or yellow color choice"),
                ))
            }
        }
    } else {
        None
    };

    let draw_count = forced_draw_count(&card);
    let empties_hand = session.memberships[member].hand_size() == 1;
    // After the play the old top joins the reshufflable discards.
    let supply_after_play = session.draw_pile.len() + session.discard.len();
    if draw_count > 0 && !empties_hand && supply_after_play < draw_count {
        return Err(DomainError::exhausted(
            ExhaustedKind::DeckExhausted,
            format!("forced draw of {draw_count} with {supply_after_play} cards available"),
        ));
    }

    remove_from_hand(session, member, card_id);
    place_on_discard(session, card_id);
    if let Some(color) = declared_color {
        session.cards[card_id as usize].color = color;
    }
    session.memberships[member].declared_low_hand = false;
    let played = session.cards[card_id as usize];
    session.events.append(
        EventKind::CardPlayed {
            card: played,
            chosen_color: declared_color,
        },
        Some(player),
    );

    let mut outcome = PlayOutcome {
        card: played,
        reversed: false,
        forced_draw: None,
        skipped: None,
        winner: None,
    };

    if session.memberships[member].hand_size() == 0 {
        finish(session, player);
        outcome.winner = Some(player);
        return Ok(outcome);
    }

    if causes_reverse(&played) {
        session.direction = session.direction.reversed();
        outcome.reversed = true;
        session.events.append(
            EventKind::DirectionReversed {
                direction: session.direction,
            },
            Some(player),
        );
    }

    let mut skip_next = causes_skip(&played);
    if draw_count > 0 {
        let victim_seat = session.next_seat();
        let victim = session.member_at_seat(victim_seat).ok_or_else(|| {
            DomainError::validation_other(format!(
                "Invariant violated: no member at seat {victim_seat}"
            ))
        })?;
        draw(session, victim, draw_count)?;
        session.memberships[victim].declared_low_hand = false;
        let victim_id = session.memberships[victim].player_id;
        session
            .events
            .append(EventKind::ForcedDraw { count: draw_count }, Some(victim_id));
        outcome.forced_draw = Some((victim_id, draw_count));
        outcome.skipped = Some(victim_id);
        // Stepping past the drawing player is this card's one skip.
        advance(session);
        skip_next = false;
    }

    // With two players a reverse hands the turn straight back, like a skip.
    if outcome.reversed && session.active_count() == 2 {
        skip_next = true;
    }

    if skip_next {
        let skipped_seat = session.next_seat();
        outcome.skipped = session
            .member_at_seat(skipped_seat)
            .map(|i| session.memberships[i].player_id);
        advance(session);
    }
    advance(session);

    Ok(outcome)
}

/// Draw one card for the current player and pass the turn.
pub fn draw_card(session: &mut Session, player: PlayerId) -> Result<CardId, DomainError> {
    require_in_progress(session)?;
    let member = require_turn(session, player)?;

    let drawn = draw(session, member, 1)?;
    let id = drawn.first().copied().ok_or_else(|| {
        DomainError::validation_other("Invariant violated: draw returned no card")
    })?;
    if session.memberships[member].hand_size() != 1 {
        session.memberships[member].declared_low_hand = false;
    }
    session
        .events
        .append(EventKind::CardDrawn { count: 1 }, Some(player));
    advance(session);
    Ok(id)
}

/// Record the low-hand ("UNO") declaration for a player holding one card.
pub fn declare_low_hand(session: &mut Session, player: PlayerId) -> Result<(), DomainError> {
    require_in_progress(session)?;
    let member = session.require_active_member(player)?;
    let hand_size = session.memberships[member].hand_size();
    if hand_size != 1 {
        return Err(DomainError::validation(
            ValidationKind::InvalidDeclaration,
            format!("low hand needs exactly one card, player {player} holds {hand_size}"),
        ));
    }
    session.memberships[member].declared_low_hand = true;
    session.events.append(EventKind::UnoCalled, Some(player));
    Ok(())
}

/// New current seat after the member at `left_seat` leaves a rotation of
/// `len` seats (before removal).
fn reanchor_seat(current: Seat, left_seat: Seat, len: usize, direction: Direction) -> Seat {
    let remaining = len - 1;
    if remaining == 0 {
        return 0;
    }
    if left_seat < current {
        current - 1
    } else if left_seat > current {
        current
    } else {
        match direction {
            // The next seat slides into the leaver's index.
            Direction::Clockwise => current % remaining,
            Direction::CounterClockwise => seat_offset(current, -1, remaining),
        }
    }
}

/// Deactivate a player's membership and apply the lifecycle consequences.
pub fn leave(session: &mut Session, player: PlayerId) -> Result<(), DomainError> {
    let member = session.require_active_member(player)?;
    let left_seat = session.seat_of(player);
    let len_before = session.active_count();

    session.memberships[member].active = false;
    session.events.append(EventKind::PlayerLeft, Some(player));

    match session.status {
        SessionStatus::WaitingForPlayers if player == session.founder => {
            session.status = SessionStatus::Cancelled;
            session.finished_at = Some(OffsetDateTime::now_utc());
            session.events.append(EventKind::SessionCancelled, None);
        }
        SessionStatus::InProgress => {
            let remaining = session.active_order();
            if remaining.len() < 2 {
                let winner = remaining
                    .first()
                    .map(|&i| session.memberships[i].player_id);
                session.status = SessionStatus::Finished;
                session.winner = winner;
                session.finished_at = Some(OffsetDateTime::now_utc());
                session.current_player_index = 0;
                session
                    .events
                    .append(EventKind::GameEndedInsufficientPlayers { winner }, None);
            } else if let Some(left_seat) = left_seat {
                session.current_player_index = reanchor_seat(
                    session.current_player_index,
                    left_seat,
                    len_before,
                    session.direction,
                );
            }
        }
        _ => {}
    }
    Ok(())
}
