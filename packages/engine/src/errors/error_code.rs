//! Error codes for the session engine.
//!
//! This module defines every code a [`DomainError`](super::DomainError) can
//! map to. Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings the
//! transport layer exposes to clients.

use core::fmt;
use std::str::FromStr;

/// Centralized error codes for the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Not found
    /// Unknown session code
    SessionNotFound,
    /// Player has no membership in the session
    PlayerNotFound,
    /// Unknown card id
    CardNotFound,

    // Precondition violations
    /// Session no longer accepts joins
    SessionNotJoinable,
    /// Session already holds its maximum number of players
    SessionFull,
    /// Player already holds an active membership
    AlreadyJoined,
    /// Operation requires an in-progress game
    GameNotInProgress,
    /// Another player is to act
    NotYourTurn,
    /// Card is not in the acting player's hand
    CardNotOwned,
    /// Card cannot be played on the current top card
    IllegalMove,
    /// Wild cards need a red, blue, green or yellow color choice
    ColorChoiceRequired,
    /// Low-hand declaration requires exactly one card in hand
    InvalidDeclaration,
    /// Player bounds outside 2..=4 or min above max
    InvalidPlayerCount,
    /// General validation error
    ValidationError,

    // Conflicts
    /// No free join code after the configured number of attempts
    JoinCodeConflict,

    // Resource exhaustion
    /// Deck too small for the opening deal
    InsufficientCards,
    /// Draw pile and discard pile cannot supply a draw
    DeckExhausted,

    // Contention
    /// Exclusive access not acquired before the caller's deadline
    SessionBusy,

    // System
    /// Invalid engine configuration
    ConfigError,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 19] = [
        ErrorCode::SessionNotFound,
        ErrorCode::PlayerNotFound,
        ErrorCode::CardNotFound,
        ErrorCode::SessionNotJoinable,
        ErrorCode::SessionFull,
        ErrorCode::AlreadyJoined,
        ErrorCode::GameNotInProgress,
        ErrorCode::NotYourTurn,
        ErrorCode::CardNotOwned,
        ErrorCode::IllegalMove,
        ErrorCode::ColorChoiceRequired,
        ErrorCode::InvalidDeclaration,
        ErrorCode::InvalidPlayerCount,
        ErrorCode::ValidationError,
        ErrorCode::JoinCodeConflict,
        ErrorCode::InsufficientCards,
        ErrorCode::DeckExhausted,
        ErrorCode::SessionBusy,
        ErrorCode::ConfigError,
    ];

    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::CardNotFound => "CARD_NOT_FOUND",

            Self::SessionNotJoinable => "SESSION_NOT_JOINABLE",
            Self::SessionFull => "SESSION_FULL",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::GameNotInProgress => "GAME_NOT_IN_PROGRESS",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::CardNotOwned => "CARD_NOT_OWNED",
            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::ColorChoiceRequired => "COLOR_CHOICE_REQUIRED",
            Self::InvalidDeclaration => "INVALID_DECLARATION",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",

            Self::InsufficientCards => "INSUFFICIENT_CARDS",
            Self::DeckExhausted => "DECK_EXHAUSTED",

            Self::SessionBusy => "SESSION_BUSY",

            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Whether the code reflects a caller-side rule violation rather than an
    /// engine or contention fault.
    pub const fn is_rule_violation(&self) -> bool {
        !matches!(
            self,
            Self::InsufficientCards | Self::DeckExhausted | Self::SessionBusy | Self::ConfigError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown error code: {s}"))
    }
}
