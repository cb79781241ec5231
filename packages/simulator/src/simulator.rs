//! Drives complete sessions through the registry with bot players.
//!
//! Every operation goes through the public registry API, and the session's
//! invariants are checked after each one, so a simulation run doubles as a
//! soak test of the engine.

use std::collections::HashMap;

use tracing::{debug, warn};
use uno_engine::{
    DomainError, ErrorCode, EventKind, PlayerId, SessionRegistry, SessionSnapshot, SessionStatus,
};

use crate::bots::{Bot, BotAction};

/// Outcome of one simulated session.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub code: String,
    pub players: Vec<PlayerId>,
    pub final_snapshot: SessionSnapshot,
    /// Turns taken (plays plus voluntary draws).
    pub turns: u32,
    /// The game could not continue because the deck ran dry.
    pub stalled: bool,
    pub counts: EventCounts,
}

/// Tallies over the session's event log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub plays: u32,
    pub voluntary_draws: u32,
    pub forced_draws: u32,
    pub forced_cards: u32,
    pub reversals: u32,
    pub reshuffles: u32,
    pub low_hand_calls: u32,
    pub plays_by_player: HashMap<PlayerId, u32>,
}

pub struct Simulator<'a> {
    registry: &'a SessionRegistry,
    max_turns: u32,
}

impl<'a> Simulator<'a> {
    pub fn new(registry: &'a SessionRegistry, max_turns: u32) -> Self {
        Self {
            registry,
            max_turns,
        }
    }

    /// Seat `bots.len()` players (ids 1..), play until the game ends, stalls
    /// or hits the turn cap.
    pub fn simulate_game(
        &self,
        seed: u64,
        bots: &mut [Box<dyn Bot>],
    ) -> Result<GameResult, DomainError> {
        let n = bots.len();
        let players: Vec<PlayerId> = (1..=n as PlayerId).collect();
        let code = self
            .registry
            .create_with_seed(players[0], Some(n), Some(n), seed)?
            .code;
        for &p in &players[1..] {
            self.registry.join(&code, p)?;
        }
        self.check(&code)?;

        let mut turns = 0;
        let mut stalled = false;
        while turns < self.max_turns {
            let public = self.registry.lookup(&code)?;
            if public.status != SessionStatus::InProgress {
                break;
            }
            let Some(player) = public.current_player else {
                break;
            };
            let seat = players
                .iter()
                .position(|&p| p == player)
                .ok_or_else(|| DomainError::validation_other("current player is not seated"))?;

            let view = self.registry.snapshot(&code, player)?;
            if view.member(player).is_some_and(|m| m.hand_size == 1 && !m.declared_low_hand) {
                self.registry.declare_low_hand(&code, player)?;
            }

            let result = match bots[seat].choose(&view) {
                BotAction::Play { card, color } => {
                    self.registry.play_card(&code, player, card, color)
                }
                BotAction::Draw => self.registry.draw_card(&code, player),
            };
            match result {
                Ok(_) => turns += 1,
                Err(e) if e.code() == ErrorCode::DeckExhausted => {
                    // A hoarded deck can leave no card to draw.
                    let fallback = self.registry.draw_card(&code, player);
                    if fallback.is_err() {
                        warn!(code = %code, player, "Deck exhausted, stopping game");
                        stalled = true;
                        break;
                    }
                    turns += 1;
                }
                Err(e) => return Err(e),
            }
            self.check(&code)?;
        }

        let final_snapshot = self.registry.lookup(&code)?;
        let counts = count_events(self.registry, &code)?;
        debug!(
            code = %code,
            turns,
            status = ?final_snapshot.status,
            winner = ?final_snapshot.winner,
            "Game simulated"
        );
        self.registry.remove(&code);

        Ok(GameResult {
            code,
            players,
            final_snapshot,
            turns,
            stalled,
            counts,
        })
    }

    fn check(&self, code: &str) -> Result<(), DomainError> {
        self.registry.inspect(code, |s| s.check_invariants())?
    }
}

fn count_events(registry: &SessionRegistry, code: &str) -> Result<EventCounts, DomainError> {
    let mut counts = EventCounts::default();
    for event in registry.read_events(code, 0)? {
        match event.kind {
            EventKind::CardPlayed { .. } => {
                counts.plays += 1;
                if let Some(actor) = event.actor {
                    *counts.plays_by_player.entry(actor).or_default() += 1;
                }
            }
            EventKind::CardDrawn { .. } => counts.voluntary_draws += 1,
            EventKind::ForcedDraw { count } => {
                counts.forced_draws += 1;
                counts.forced_cards += count as u32;
            }
            EventKind::DirectionReversed { .. } => counts.reversals += 1,
            EventKind::DeckReshuffled { .. } => counts.reshuffles += 1,
            EventKind::UnoCalled => counts.low_hand_calls += 1,
            _ => {}
        }
    }
    Ok(counts)
}
