//! Domain layer: pure game logic types and helpers.

pub mod cards_types;
pub mod deck;
pub mod draw_pile;
pub mod events;
pub mod rules;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod turns;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_props_conservation;
#[cfg(test)]
mod tests_props_legality;
#[cfg(test)]
mod tests_props_turns;
#[cfg(test)]
mod tests_snapshot;

// Re-exports for ergonomics
pub use cards_types::{Card, CardId, CardKind, CardLocation, Color, PlayerId};
pub use deck::build_deck;
pub use draw_pile::available_supply;
pub use events::{Event, EventKind, EventLog};
pub use rules::{has_playable_card, hand_points, is_playable, playable_cards, point_value};
pub use seed_derivation::derive_shuffle_seed;
pub use snapshot::{snapshot, MemberView, SessionSnapshot};
pub use state::{Direction, Membership, Seat, Session, SessionStatus};
pub use turns::{NewSession, PlayOutcome};
