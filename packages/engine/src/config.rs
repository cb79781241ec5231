//! Engine configuration sourced from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::rules::{DECK_SIZE, MAX_PLAYERS, MIN_PLAYERS, OPENING_HAND_SIZE};
use crate::errors::domain::DomainError;

pub const DEFAULT_JOIN_CODE_LENGTH: usize = 6;
pub const DEFAULT_JOIN_CODE_ATTEMPTS: usize = 16;
const JOIN_CODE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=16;

/// Tunables for a session registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Used when a create call passes no minimum.
    pub default_min_players: usize,
    /// Used when a create call passes no maximum.
    pub default_max_players: usize,
    pub opening_hand_size: usize,
    pub join_code_length: usize,
    /// Collision retries before giving up with `JoinCodeConflict`.
    pub join_code_attempts: usize,
    /// Bounded wait for exclusive session access; `None` waits.
    pub lock_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_min_players: MIN_PLAYERS,
            default_max_players: MAX_PLAYERS,
            opening_hand_size: OPENING_HAND_SIZE,
            join_code_length: DEFAULT_JOIN_CODE_LENGTH,
            join_code_attempts: DEFAULT_JOIN_CODE_ATTEMPTS,
            lock_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Build from `UNO_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, DomainError> {
        let defaults = Self::default();
        let config = Self {
            default_min_players: var_or("UNO_DEFAULT_MIN_PLAYERS", defaults.default_min_players)?,
            default_max_players: var_or("UNO_DEFAULT_MAX_PLAYERS", defaults.default_max_players)?,
            opening_hand_size: var_or("UNO_OPENING_HAND_SIZE", defaults.opening_hand_size)?,
            join_code_length: var_or("UNO_JOIN_CODE_LENGTH", defaults.join_code_length)?,
            join_code_attempts: var_or("UNO_JOIN_CODE_ATTEMPTS", defaults.join_code_attempts)?,
            lock_timeout: optional_var::<u64>("UNO_LOCK_TIMEOUT_MS")?.map(Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let (min, max) = (self.default_min_players, self.default_max_players);
        if !(MIN_PLAYERS <= min && min <= max && max <= MAX_PLAYERS) {
            return Err(DomainError::config(format!(
                "player defaults must satisfy {MIN_PLAYERS} <= min ({min}) <= max ({max}) <= {MAX_PLAYERS}"
            )));
        }
        let needed = self
            .opening_hand_size
            .checked_mul(MAX_PLAYERS)
            .and_then(|dealt| dealt.checked_add(1));
        if self.opening_hand_size == 0 || !matches!(needed, Some(n) if n <= DECK_SIZE) {
            return Err(DomainError::config(format!(
                "opening hand size {} cannot be dealt to {MAX_PLAYERS} players from {DECK_SIZE} cards",
                self.opening_hand_size
            )));
        }
        if !JOIN_CODE_LENGTH_RANGE.contains(&self.join_code_length) {
            return Err(DomainError::config(format!(
                "join code length {} outside {JOIN_CODE_LENGTH_RANGE:?}",
                self.join_code_length
            )));
        }
        if self.join_code_attempts == 0 {
            return Err(DomainError::config("join code attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Parse an optional environment variable.
fn optional_var<T: FromStr>(name: &str) -> Result<Option<T>, DomainError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            DomainError::config(format!(
                "Environment variable '{name}' has unparsable value '{raw}'"
            ))
        }),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(DomainError::config(format!(
            "Environment variable '{name}' is not valid unicode"
        ))),
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> Result<T, DomainError> {
    Ok(optional_var(name)?.unwrap_or(default))
}
