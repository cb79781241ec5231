//! Domain-level error type returned by every engine operation.
//!
//! This error type is transport-agnostic. The surrounding service maps each
//! error to a user-visible message through [`DomainError::code`]; the engine
//! itself only classifies and returns.

use thiserror::Error;

use crate::errors::error_code::ErrorCode;

/// Entities an operation can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Session,
    Player,
    Card,
}

/// Rule and precondition violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    SessionNotJoinable,
    GameNotInProgress,
    NotYourTurn,
    CardNotOwned,
    IllegalMove,
    ColorChoiceRequired,
    InvalidDeclaration,
    InvalidPlayerCount,
    /// Invariant breaches and anything without a dedicated kind.
    Other,
}

/// Precondition violations caused by other members or sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    SessionFull,
    AlreadyJoined,
    JoinCodeConflict,
}

/// Card supply failures. Dealing cannot run short with the 108-card deck and
/// at most four players; draws can once players hoard most of the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustedKind {
    InsufficientCards,
    DeckExhausted,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input validation or game rule violation
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Semantic conflict with existing state
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    /// Not enough cards to satisfy a deal or draw
    #[error("exhausted {0:?}: {1}")]
    Exhausted(ExhaustedKind, String),
    /// Exclusive access to the session was not acquired in time
    #[error("session busy: {0}")]
    Busy(String),
    /// Invalid engine configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Other, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn exhausted(kind: ExhaustedKind, detail: impl Into<String>) -> Self {
        Self::Exhausted(kind, detail.into())
    }
    pub fn busy(detail: impl Into<String>) -> Self {
        Self::Busy(detail.into())
    }
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::SessionNotJoinable => ErrorCode::SessionNotJoinable,
                ValidationKind::GameNotInProgress => ErrorCode::GameNotInProgress,
                ValidationKind::NotYourTurn => ErrorCode::NotYourTurn,
                ValidationKind::CardNotOwned => ErrorCode::CardNotOwned,
                ValidationKind::IllegalMove => ErrorCode::IllegalMove,
                ValidationKind::ColorChoiceRequired => ErrorCode::ColorChoiceRequired,
                ValidationKind::InvalidDeclaration => ErrorCode::InvalidDeclaration,
                ValidationKind::InvalidPlayerCount => ErrorCode::InvalidPlayerCount,
                ValidationKind::Other => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::SessionFull => ErrorCode::SessionFull,
                ConflictKind::AlreadyJoined => ErrorCode::AlreadyJoined,
                ConflictKind::JoinCodeConflict => ErrorCode::JoinCodeConflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Session => ErrorCode::SessionNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
                NotFoundKind::Card => ErrorCode::CardNotFound,
            },
            DomainError::Exhausted(kind, _) => match kind {
                ExhaustedKind::InsufficientCards => ErrorCode::InsufficientCards,
                ExhaustedKind::DeckExhausted => ErrorCode::DeckExhausted,
            },
            DomainError::Busy(_) => ErrorCode::SessionBusy,
            DomainError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Human-readable detail without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Exhausted(_, d)
            | DomainError::Busy(d)
            | DomainError::Config(d) => d,
        }
    }
}
