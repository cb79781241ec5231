//! Session registry: lookup by join code and exclusive per-session access.
//!
//! Sessions live in a `DashMap` keyed by code, each behind its own
//! `parking_lot::RwLock`. Handles are cloned out of the map before locking,
//! so a map shard is never held while a session lock is.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::events::Event;
use crate::domain::rules::is_legal_opening_card;
use crate::domain::snapshot::{snapshot, SessionSnapshot};
use crate::domain::state::{Session, SessionStatus};
use crate::domain::turns::{self, NewSession};
use crate::domain::{CardId, Color, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::utils::join_code::generate_join_code;

type SessionHandle = Arc<RwLock<Session>>;

/// Owns every live session; share it across threads behind an `Arc`.
pub struct SessionRegistry {
    config: EngineConfig,
    sessions: DashMap<String, SessionHandle>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SessionRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Open a session with a fresh random seed. `None` bounds use the
    /// configured defaults.
    pub fn create(
        &self,
        founder: PlayerId,
        min_players: Option<usize>,
        max_players: Option<usize>,
    ) -> Result<SessionSnapshot, DomainError> {
        let seed = rand::rng().random::<u64>();
        self.create_with_seed(founder, min_players, max_players, seed)
    }

    /// Open a session whose shuffles derive from `seed`.
    pub fn create_with_seed(
        &self,
        founder: PlayerId,
        min_players: Option<usize>,
        max_players: Option<usize>,
        seed: u64,
    ) -> Result<SessionSnapshot, DomainError> {
        let min_players = min_players.unwrap_or(self.config.default_min_players);
        let max_players = max_players.unwrap_or(self.config.default_max_players);

        for attempt in 1..=self.config.join_code_attempts {
            let code = generate_join_code(self.config.join_code_length);
            match self.sessions.entry(code.clone()) {
                Entry::Occupied(_) => {
                    debug!(code = %code, attempt, "Join code collision, retrying");
                }
                Entry::Vacant(slot) => {
                    let session = turns::create_session(NewSession {
                        code: code.clone(),
                        founder,
                        min_players,
                        max_players,
                        opening_hand_size: self.config.opening_hand_size,
                        seed,
                    })?;
                    let snap = snapshot(&session, Some(founder));
                    slot.insert(Arc::new(RwLock::new(session)));
                    info!(code = %code, founder, min_players, max_players, "Session created");
                    return Ok(snap);
                }
            }
        }

        warn!(
            attempts = self.config.join_code_attempts,
            "Join code space exhausted"
        );
        Err(DomainError::conflict(
            ConflictKind::JoinCodeConflict,
            format!(
                "no free join code after {} attempts",
                self.config.join_code_attempts
            ),
        ))
    }

    fn handle(&self, code: &str) -> Result<SessionHandle, DomainError> {
        let key = normalize_code(code);
        self.sessions
            .get(&key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Session, format!("no session {key}"))
            })
    }

    /// Run `f` against a consistent read view of the session.
    fn read<T>(&self, code: &str, f: impl FnOnce(&Session) -> T) -> Result<T, DomainError> {
        let handle = self.handle(code)?;
        let guard = match self.config.lock_timeout {
            Some(timeout) => handle
                .try_read_for(timeout)
                .ok_or_else(|| busy(code, timeout))?,
            None => handle.read(),
        };
        Ok(f(&*guard))
    }

    /// Shared read access to the stored session; takes no write lock and
    /// makes no working copy.
    pub fn inspect<T>(&self, code: &str, f: impl FnOnce(&Session) -> T) -> Result<T, DomainError> {
        self.read(code, f)
    }

    /// Public snapshot without any private hand.
    pub fn lookup(&self, code: &str) -> Result<SessionSnapshot, DomainError> {
        self.read(code, |s| snapshot(s, None))
    }

    /// Snapshot as seen by `viewer`, including their own hand.
    pub fn snapshot(&self, code: &str, viewer: PlayerId) -> Result<SessionSnapshot, DomainError> {
        self.read(code, |s| snapshot(s, Some(viewer)))
    }

    /// Events with a sequence number strictly greater than `after_sequence`.
    pub fn read_events(&self, code: &str, after_sequence: u64) -> Result<Vec<Event>, DomainError> {
        self.read(code, |s| s.events().read_from(after_sequence))
    }

    /// Exclusive access under the configured lock timeout.
    ///
    /// `op` runs against a working copy that replaces the stored session
    /// only when `op` returns `Ok`.
    pub fn with_session<T, F>(&self, code: &str, op: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Session) -> Result<T, DomainError>,
    {
        self.apply(code, self.config.lock_timeout, op)
    }

    /// Exclusive access, failing with `Busy` if the lock is not acquired
    /// within `timeout`.
    pub fn with_session_timeout<T, F>(
        &self,
        code: &str,
        timeout: Duration,
        op: F,
    ) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Session) -> Result<T, DomainError>,
    {
        self.apply(code, Some(timeout), op)
    }

    fn apply<T, F>(&self, code: &str, timeout: Option<Duration>, op: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Session) -> Result<T, DomainError>,
    {
        let handle = self.handle(code)?;
        let mut guard = match timeout {
            Some(timeout) => handle
                .try_write_for(timeout)
                .ok_or_else(|| busy(code, timeout))?,
            None => handle.write(),
        };

        let mut working = (*guard).clone();
        let before = working.status();
        let out = op(&mut working)?;
        log_transition(&working, before);
        *guard = working;
        Ok(out)
    }

    /// Apply a player operation and return that player's snapshot.
    fn act<F>(
        &self,
        code: &str,
        player: PlayerId,
        op_name: &'static str,
        op: F,
    ) -> Result<SessionSnapshot, DomainError>
    where
        F: FnOnce(&mut Session) -> Result<(), DomainError>,
    {
        let result = self.with_session(code, |s| {
            op(s)?;
            Ok(snapshot(s, Some(player)))
        });
        match &result {
            Ok(snap) => debug!(
                code = %snap.code,
                player_id = player,
                op = op_name,
                sequence = snap.last_sequence,
                "Operation applied"
            ),
            Err(e) => debug!(
                code,
                player_id = player,
                op = op_name,
                error = %e.code(),
                "Operation rejected"
            ),
        }
        result
    }

    pub fn join(&self, code: &str, player: PlayerId) -> Result<SessionSnapshot, DomainError> {
        self.act(code, player, "join", |s| turns::join(s, player))
    }

    pub fn play_card(
        &self,
        code: &str,
        player: PlayerId,
        card_id: CardId,
        chosen_color: Option<Color>,
    ) -> Result<SessionSnapshot, DomainError> {
        self.act(code, player, "play_card", |s| {
            turns::play_card(s, player, card_id, chosen_color).map(|_| ())
        })
    }

    pub fn draw_card(&self, code: &str, player: PlayerId) -> Result<SessionSnapshot, DomainError> {
        self.act(code, player, "draw_card", |s| {
            turns::draw_card(s, player).map(|_| ())
        })
    }

    pub fn declare_low_hand(
        &self,
        code: &str,
        player: PlayerId,
    ) -> Result<SessionSnapshot, DomainError> {
        self.act(code, player, "declare_low_hand", |s| {
            turns::declare_low_hand(s, player)
        })
    }

    pub fn leave(&self, code: &str, player: PlayerId) -> Result<SessionSnapshot, DomainError> {
        self.act(code, player, "leave", |s| turns::leave(s, player))
    }

    fn handles(&self) -> Vec<SessionHandle> {
        self.sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Sessions still waiting for players, oldest first.
    pub fn available_sessions(&self) -> Vec<SessionSnapshot> {
        let mut open: Vec<SessionSnapshot> = self
            .handles()
            .into_iter()
            .filter_map(|handle| {
                let session = handle.read();
                (session.status() == SessionStatus::WaitingForPlayers)
                    .then(|| snapshot(&session, None))
            })
            .collect();
        open.sort_by(|a, b| (a.created_at, &a.code).cmp(&(b.created_at, &b.code)));
        open
    }

    /// Open sessions where `player` holds an active membership.
    pub fn sessions_for_player(&self, player: PlayerId) -> Vec<SessionSnapshot> {
        let mut mine: Vec<SessionSnapshot> = self
            .handles()
            .into_iter()
            .filter_map(|handle| {
                let session = handle.read();
                let member = session.membership(player).is_some_and(|m| m.active);
                (member && !session.status().is_closed())
                    .then(|| snapshot(&session, Some(player)))
            })
            .collect();
        mine.sort_by(|a, b| (a.created_at, &a.code).cmp(&(b.created_at, &b.code)));
        mine
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, code: &str) -> bool {
        let removed = self.sessions.remove(&normalize_code(code)).is_some();
        if removed {
            info!(code, "Session removed");
        }
        removed
    }

    /// Drop every finished or cancelled session; returns how many went.
    pub fn purge_closed(&self) -> usize {
        let closed: Vec<String> = self
            .handles()
            .into_iter()
            .filter_map(|handle| {
                let session = handle.read();
                session.status().is_closed().then(|| session.code().to_string())
            })
            .collect();
        // Closed is terminal, so no re-check is needed at removal.
        let purged = closed
            .iter()
            .filter(|code| self.sessions.remove(*code).is_some())
            .count();
        if purged > 0 {
            info!(purged, "Purged closed sessions");
        }
        purged
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn busy(code: &str, timeout: Duration) -> DomainError {
    let waited_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    warn!(code, waited_ms, "Session lock wait timed out");
    DomainError::busy(format!("session {code} busy after {waited_ms}ms"))
}

fn log_transition(session: &Session, before: SessionStatus) {
    let after = session.status();
    if after == before {
        return;
    }
    let code = session.code();
    match after {
        SessionStatus::InProgress => {
            info!(code, players = session.active_count(), "Game started");
            if let Some(top) = session.top_card() {
                if !is_legal_opening_card(top) {
                    warn!(code, card = %top, "Opening card fallback used");
                }
            }
        }
        SessionStatus::Finished => {
            info!(code, winner = ?session.winner(), "Game finished");
        }
        SessionStatus::Cancelled => info!(code, "Session cancelled"),
        SessionStatus::WaitingForPlayers => {}
    }
}
