//! Core types for Wirkzeit: entity ids, the in-world clock, and combat.
//!
//! Effects never read a global game state. Everything they need to know
//! about time and turn order comes through the [`ClockProvider`] and
//! [`TurnOrder`] traits defined here, so callers can back them with a
//! live table, a test fixture, or a deserialized scenario.

/// The in-world clock and the clock provider trait.
pub mod clock;
/// Combat encounters, initiative, and the turn-order provider trait.
pub mod combat;
/// Entity identifiers.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;

/// Re-export clock types.
pub use clock::{ClockProvider, SECONDS_PER_ROUND, WorldClock};
/// Re-export combat types.
pub use combat::{Combat, Combatant, Turn, TurnOrder};
/// Re-export entity identifiers.
pub use entity::EntityId;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
