//! The effect tracker: a registry of effects that need periodic re-evaluation.
//!
//! Actors register their effects during data preparation. Callers then
//! [`refresh`](EffectTracker::refresh) the tracker whenever the clock or the
//! turn order moves and get back one [`ExpiryNotice`] per effect that has
//! run out since the previous refresh.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use wz_core::EntityId;

use crate::config::TrackerConfig;
use crate::duration::{DurationUnit, EvaluationContext, Expiration};
use crate::effect::Effect;
use crate::lifecycle::EffectRegistry;

/// Reported once when a tracked effect runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiryNotice {
    /// The expired effect.
    pub effect: EntityId,
    /// The actor holding it.
    pub actor: Option<EntityId>,
    /// Display name of the effect.
    pub name: String,
    /// Seconds remaining at the time of the notice (zero or negative).
    pub remaining: f64,
}

impl ExpiryNotice {
    fn new(effect: &Effect, remaining: f64) -> Self {
        Self {
            effect: effect.id,
            actor: effect.actor,
            name: effect.name.clone(),
            remaining,
        }
    }
}

#[derive(Debug, Clone)]
struct TrackedEffect {
    effect: Effect,
    /// Whether an expiry notice has already gone out for this effect.
    reported: bool,
}

/// Registry of live effects keyed by effect id.
#[derive(Debug, Clone, Default)]
pub struct EffectTracker {
    config: TrackerConfig,
    effects: BTreeMap<EntityId, TrackedEffect>,
}

impl EffectTracker {
    /// Create an empty tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            effects: BTreeMap::new(),
        }
    }

    /// Number of tracked effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Returns true if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// The tracked snapshot of an effect.
    pub fn get(&self, id: EntityId) -> Option<&Effect> {
        self.effects.get(&id).map(|t| &t.effect)
    }

    /// All tracked effects with their expiration, soonest first.
    pub fn effects(&self, ctx: &EvaluationContext<'_>) -> Vec<(&Effect, Expiration)> {
        let mut out: Vec<_> = self
            .effects
            .values()
            .map(|t| (&t.effect, t.effect.remaining_duration(ctx)))
            .collect();
        out.sort_by(|a, b| by_remaining_then_name(a.1.remaining, &a.0.name, b.1.remaining, &b.0.name));
        out
    }

    /// Re-evaluate every tracked effect.
    ///
    /// Returns notices for effects that expired since the last refresh. An
    /// effect that becomes active again (e.g. after its duration is
    /// extended) will be reported again the next time it runs out.
    pub fn refresh(&mut self, ctx: &EvaluationContext<'_>) -> Vec<ExpiryNotice> {
        let mut notices = Vec::new();
        for tracked in self.effects.values_mut() {
            let expiration = tracked.effect.remaining_duration(ctx);
            if expiration.expired && !tracked.reported {
                tracked.reported = true;
                notices.push(ExpiryNotice::new(&tracked.effect, expiration.remaining));
            } else if !expiration.expired {
                tracked.reported = false;
            }
        }
        self.finish(notices)
    }

    /// Notify the tracker that the encounter has ended.
    ///
    /// Every encounter-bound effect is flagged expired and reported.
    pub fn end_encounter(&mut self) -> Vec<ExpiryNotice> {
        let mut notices = Vec::new();
        for tracked in self.effects.values_mut() {
            let effect = &mut tracked.effect;
            if *effect.duration().unit() != DurationUnit::Encounter || effect.is_expired() {
                continue;
            }
            effect.set_expired(true);
            tracked.reported = true;
            notices.push(ExpiryNotice::new(effect, 0.0));
        }
        self.finish(notices)
    }

    fn finish(&mut self, mut notices: Vec<ExpiryNotice>) -> Vec<ExpiryNotice> {
        notices.sort_by(|a, b| by_remaining_then_name(a.remaining, &a.name, b.remaining, &b.name));
        for notice in &notices {
            tracing::info!(effect = %notice.name, remaining = notice.remaining, "effect expired");
            if self.config.auto_remove_expired {
                self.effects.remove(&notice.effect);
            }
        }
        notices
    }
}

impl EffectRegistry for EffectTracker {
    fn register(&mut self, effect: &Effect) {
        match self.effects.get_mut(&effect.id) {
            Some(tracked) => {
                // An encounter that already ended stays ended for this effect.
                let ended = tracked.effect.is_expired();
                tracked.effect = effect.clone();
                if ended {
                    tracked.effect.set_expired(true);
                }
            }
            None => {
                tracing::debug!(effect = %effect.name, id = %effect.id, "effect registered");
                self.effects.insert(
                    effect.id,
                    TrackedEffect {
                        effect: effect.clone(),
                        reported: false,
                    },
                );
            }
        }
    }

    fn unregister(&mut self, id: EntityId) {
        if let Some(tracked) = self.effects.remove(&id) {
            tracing::debug!(effect = %tracked.effect.name, %id, "effect unregistered");
        }
    }
}

fn by_remaining_then_name(a: f64, a_name: &str, b: f64, b_name: &str) -> Ordering {
    a.total_cmp(&b).then_with(|| a_name.cmp(b_name))
}
