//! Total and remaining duration of timed effects.
//!
//! Concrete durations tick down against the world clock. In combat they
//! also have to line up with turn boundaries: when the clock lands exactly
//! on the end of the duration, the current combatant's initiative decides
//! whether the effect is already over.

use std::fmt;

use wz_core::{ClockProvider, TurnOrder};

use super::{DurationConfig, DurationUnit, Expiry};
use crate::start::StartRecord;

/// Seconds of world time per unit. Unlisted units contribute nothing.
fn multiplier(unit: &DurationUnit) -> f64 {
    match unit {
        DurationUnit::Rounds => 6.0,
        DurationUnit::Minutes => 60.0,
        DurationUnit::Hours => 3600.0,
        DurationUnit::Days => 86400.0,
        _ => 0.0,
    }
}

/// Total length of a duration in seconds. Infinite for unlimited and
/// encounter durations.
pub fn total_duration(duration: &DurationConfig) -> f64 {
    match duration.unit() {
        DurationUnit::Unlimited | DurationUnit::Encounter => f64::INFINITY,
        unit => duration.value() * multiplier(unit),
    }
}

/// Time remaining on an effect and whether it has run out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expiration {
    /// Seconds left. Negative once overdue, infinite if it never runs out.
    pub remaining: f64,
    /// Whether the effect is over.
    pub expired: bool,
}

impl Expiration {
    fn never() -> Self {
        Self {
            remaining: f64::INFINITY,
            expired: false,
        }
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.expired { "expired" } else { "active" };
        if self.remaining.is_infinite() {
            write!(f, "{state}, unlimited")
        } else {
            write!(f, "{state}, {}s left", self.remaining)
        }
    }
}

/// A read-only snapshot of the world an effect is evaluated against.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Current world time in seconds.
    pub world_time: f64,
    /// The running encounter, if any.
    pub combat: Option<&'a dyn TurnOrder>,
}

impl<'a> EvaluationContext<'a> {
    /// Evaluate at the clock's current time with no combat.
    pub fn new(clock: &impl ClockProvider) -> Self {
        Self {
            world_time: clock.world_time(),
            combat: None,
        }
    }

    /// Attach an encounter's turn order.
    pub fn with_combat(mut self, combat: &'a dyn TurnOrder) -> Self {
        self.combat = Some(combat);
        self
    }
}

impl fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("world_time", &self.world_time)
            .field("combat", &self.combat.map(|c| c.turn()))
            .finish()
    }
}

/// Compute how much of an effect's duration is left.
///
/// `expired` is the externally maintained flag that alone governs
/// encounter durations. Evaluation is pure: it never fails and never
/// mutates its inputs.
pub fn remaining_duration(
    duration: &DurationConfig,
    start: &StartRecord,
    expired: bool,
    ctx: &EvaluationContext<'_>,
) -> Expiration {
    let total = total_duration(duration);
    if *duration.unit() == DurationUnit::Encounter {
        return Expiration {
            remaining: if expired { 0.0 } else { f64::INFINITY },
            expired,
        };
    }
    if total.is_infinite() {
        return Expiration::never();
    }

    let remaining = start.value() + total - ctx.world_time;
    let mut result = Expiration {
        remaining,
        expired: remaining <= 0.0,
    };

    if remaining == 0.0 {
        if let Some(expired) = turn_boundary_expiry(duration, start, ctx.combat) {
            result.expired = expired;
        }
    }
    result
}

/// Decide expiry when the clock sits exactly on the end of the duration.
///
/// Returns `None` when no active encounter has a combatant at the turn
/// pointer, leaving the plain sign check in charge.
fn turn_boundary_expiry(
    duration: &DurationConfig,
    start: &StartRecord,
    combat: Option<&dyn TurnOrder>,
) -> Option<bool> {
    let combat = combat.filter(|c| c.is_active())?;
    let combatant = combat.current_combatant()?;
    if combat.turns().len() <= combat.turn() {
        return None;
    }

    let initiative = combatant.initiative.unwrap_or(0.0);
    if Some(initiative) == start.initiative() {
        Some(duration.expiry() != Some(Expiry::TurnEnd))
    } else {
        Some(initiative < start.initiative().unwrap_or(0.0))
    }
}
