//! Timed game effects.
//!
//! An [`Effect`] pairs a [`DurationConfig`] with the [`StartRecord`]
//! stamped when it was created, plus the externally managed expired flag
//! that governs encounter-bound durations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wz_core::{ClockProvider, EntityId, TurnOrder};

use crate::duration::{
    DurationConfig, DurationUpdate, EvaluationContext, Expiration, remaining_duration,
    total_duration,
};
use crate::lifecycle::{EffectRegistry, Prepare};
use crate::slug::sluggify;
use crate::start::StartRecord;

/// A timed effect, usually attached to an actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    /// Unique identifier.
    #[serde(default)]
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Explicit roll-option slug. Derived from the name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// The actor holding this effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<EntityId>,
    duration: DurationConfig,
    #[serde(default)]
    start: StartRecord,
    #[serde(default)]
    expired: bool,
    /// Timestamp when the effect was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Timestamp when the effect was last edited.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Effect {
    /// Create a new effect, stamping its start from the clock and encounter.
    pub fn create(
        name: impl Into<String>,
        duration: DurationConfig,
        clock: &impl ClockProvider,
        combat: Option<&dyn TurnOrder>,
    ) -> Self {
        Self::from_parts(name, duration, StartRecord::capture(clock, combat))
    }

    /// Rebuild an effect from stored duration and start data.
    pub fn from_parts(name: impl Into<String>, duration: DurationConfig, start: StartRecord) -> Self {
        let now = Utc::now();
        let mut effect = Self {
            id: EntityId::new(),
            name: name.into(),
            slug: None,
            actor: None,
            duration,
            start,
            expired: false,
            created_at: now,
            updated_at: now,
        };
        effect.prepare_base_data();
        effect
    }

    /// Set an explicit roll-option slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// The effect's duration.
    pub fn duration(&self) -> &DurationConfig {
        &self.duration
    }

    /// When the effect began.
    pub fn start(&self) -> &StartRecord {
        &self.start
    }

    /// The externally set expired flag (used by encounter durations).
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Set the expired flag. Called when the encounter an effect is bound to ends.
    pub fn set_expired(&mut self, expired: bool) {
        self.expired = expired;
    }

    /// Total length in seconds. Infinite for unlimited and encounter effects.
    pub fn total_duration(&self) -> f64 {
        total_duration(&self.duration)
    }

    /// Time left and expiry status in the given context.
    pub fn remaining_duration(&self, ctx: &EvaluationContext<'_>) -> Expiration {
        remaining_duration(&self.duration, &self.start, self.expired, ctx)
    }

    /// Edit the duration. The start record is never touched.
    pub fn apply_update(&mut self, update: DurationUpdate) {
        self.duration.apply_update(update);
        self.updated_at = Utc::now();
    }

    /// The roll option this effect contributes to its actor.
    pub fn roll_option(&self) -> String {
        self.slug.clone().unwrap_or_else(|| sluggify(&self.name))
    }
}

impl Prepare for Effect {
    fn prepare_base_data(&mut self) {
        self.duration.prepare_base();
    }

    fn prepare_derived_data(&mut self, registry: &mut dyn EffectRegistry) {
        if self.actor.is_some() {
            registry.register(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{DurationUnit, Expiry};
    use wz_core::{Combat, Combatant, WorldClock};

    #[derive(Default)]
    struct Recorder {
        registered: Vec<EntityId>,
    }

    impl EffectRegistry for Recorder {
        fn register(&mut self, effect: &Effect) {
            self.registered.push(effect.id);
        }
        fn unregister(&mut self, id: EntityId) {
            self.registered.retain(|e| *e != id);
        }
    }

    #[test]
    fn create_stamps_start() {
        let mut combat = Combat::new();
        combat.add_combatant(Combatant::new("Seoni").with_initiative(17.0));
        combat.start().unwrap();

        let effect = Effect::create(
            "Mage Armor",
            DurationConfig::new(DurationUnit::Hours, 8.0),
            &WorldClock::new(1200.0),
            Some(&combat),
        );
        assert_eq!(effect.start().value(), 1200.0);
        assert_eq!(effect.start().initiative(), Some(17.0));
        assert_eq!(effect.total_duration(), 8.0 * 3600.0);
        assert!(!effect.is_expired());
    }

    #[test]
    fn update_leaves_start_alone() {
        let mut effect = Effect::create(
            "Haste",
            DurationConfig::new(DurationUnit::Rounds, 10.0),
            &WorldClock::new(60.0),
            None,
        );
        effect.apply_update(
            DurationUpdate::default()
                .unit(DurationUnit::Minutes)
                .value(-1.0)
                .expiry(Some(Expiry::TurnEnd)),
        );
        assert_eq!(effect.duration().value(), 1.0);
        assert_eq!(effect.duration().expiry(), Some(Expiry::TurnEnd));
        assert_eq!(effect.start().value(), 60.0);
        assert_eq!(effect.total_duration(), 60.0);
    }

    #[test]
    fn remaining_uses_effect_start() {
        let effect = Effect::from_parts(
            "Bless",
            DurationConfig::new(DurationUnit::Minutes, 1.0),
            StartRecord::new(100.0, None),
        );
        let ctx = EvaluationContext::new(&WorldClock::new(130.0));
        let r = effect.remaining_duration(&ctx);
        assert_eq!(r.remaining, 30.0);
        assert!(!r.expired);
    }

    #[test]
    fn encounter_effect_follows_flag() {
        let mut effect = Effect::from_parts("Rage", DurationConfig::encounter(), StartRecord::default());
        let ctx = EvaluationContext::new(&0.0);
        assert!(!effect.remaining_duration(&ctx).expired);
        effect.set_expired(true);
        assert!(effect.remaining_duration(&ctx).expired);
    }

    #[test]
    fn roll_option_prefers_slug() {
        let effect = Effect::from_parts("Inspire Courage", DurationConfig::unlimited(), StartRecord::default());
        assert_eq!(effect.roll_option(), "inspire-courage");
        let effect = effect.with_slug("effect-courage");
        assert_eq!(effect.roll_option(), "effect-courage");
    }

    #[test]
    fn only_owned_effects_register() {
        let mut registry = Recorder::default();
        let mut effect = Effect::from_parts("Loose", DurationConfig::unlimited(), StartRecord::default());
        effect.prepare_data(&mut registry);
        assert!(registry.registered.is_empty());

        effect.actor = Some(EntityId::new());
        effect.prepare_data(&mut registry);
        assert_eq!(registry.registered, vec![effect.id]);
    }

    #[test]
    fn deserialize_minimal_effect() {
        let effect: Effect = serde_json::from_str(
            r#"{"name":"Bless","duration":{"unit":"minutes","value":1},"start":{"value":0,"initiative":18}}"#,
        )
        .unwrap();
        assert_eq!(effect.duration().expiry(), Some(Expiry::TurnStart));
        assert_eq!(effect.start().initiative(), Some(18.0));
        assert!(!effect.is_expired());
    }
}
