//! Timed game effects for Wirkzeit.
//!
//! Computes how long an effect lasts and whether it has run out, against
//! the world clock and, in combat, the initiative turn order. Around that
//! evaluator sit the effect lifecycle (creation stamps a [`StartRecord`],
//! edits re-normalize the [`DurationConfig`]), actor data preparation, and
//! an [`EffectTracker`] that reports expirations.

/// Actors that hold effects and collect their roll options.
pub mod actor;
/// Tracker configuration.
pub mod config;
/// Duration units, normalization, and the expiry evaluator.
pub mod duration;
/// The effect item and its lifecycle hooks.
pub mod effect;
/// Error types used throughout the crate.
pub mod error;
/// Data-preparation and registry traits.
pub mod lifecycle;
/// Roll-option slugs.
pub mod slug;
/// Start records stamped at effect creation.
pub mod start;
/// Registry that re-evaluates effects and reports expirations.
pub mod tracker;

/// Re-export actor types.
pub use actor::Actor;
/// Re-export tracker configuration.
pub use config::TrackerConfig;
/// Re-export duration types and evaluator functions.
pub use duration::{
    DurationConfig, DurationUnit, DurationUpdate, EvaluationContext, Expiration, Expiry,
    remaining_duration, total_duration,
};
/// Re-export the effect item.
pub use effect::Effect;
/// Re-export error types.
pub use error::{EffectError, EffectResult};
/// Re-export lifecycle traits.
pub use lifecycle::{EffectRegistry, Prepare};
/// Re-export the slug helper.
pub use slug::sluggify;
/// Re-export start records.
pub use start::StartRecord;
/// Re-export tracker types.
pub use tracker::{EffectTracker, ExpiryNotice};
