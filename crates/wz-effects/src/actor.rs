//! Actors: the holders of effects.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wz_core::EntityId;

use crate::duration::DurationUpdate;
use crate::effect::Effect;
use crate::error::{EffectError, EffectResult};
use crate::lifecycle::{EffectRegistry, Prepare};

/// A character or creature that effects can be attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier.
    #[serde(default)]
    pub id: EntityId,
    /// Display name.
    pub name: String,
    #[serde(default)]
    effects: Vec<Effect>,
    /// Roll options contributed by effects, rebuilt on every preparation.
    #[serde(skip)]
    roll_options: BTreeSet<String>,
}

impl Actor {
    /// Create an actor with no effects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            effects: Vec::new(),
            roll_options: BTreeSet::new(),
        }
    }

    /// Attach an effect. Returns its id.
    pub fn add_effect(&mut self, mut effect: Effect) -> EffectResult<EntityId> {
        if self.effects.iter().any(|e| e.id == effect.id) {
            return Err(EffectError::DuplicateEffect(effect.id));
        }
        effect.actor = Some(self.id);
        let id = effect.id;
        self.effects.push(effect);
        Ok(id)
    }

    /// All attached effects.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Look up an attached effect.
    pub fn effect(&self, id: EntityId) -> EffectResult<&Effect> {
        self.effects
            .iter()
            .find(|e| e.id == id)
            .ok_or(EffectError::EffectNotFound(id))
    }

    /// Look up an attached effect mutably.
    pub fn effect_mut(&mut self, id: EntityId) -> EffectResult<&mut Effect> {
        self.effects
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EffectError::EffectNotFound(id))
    }

    /// Edit an attached effect's duration.
    pub fn update_effect(&mut self, id: EntityId, update: DurationUpdate) -> EffectResult<()> {
        self.effect_mut(id)?.apply_update(update);
        Ok(())
    }

    /// Remove an effect and stop tracking it.
    pub fn delete_effect(
        &mut self,
        id: EntityId,
        registry: &mut dyn EffectRegistry,
    ) -> EffectResult<Effect> {
        let index = self
            .effects
            .iter()
            .position(|e| e.id == id)
            .ok_or(EffectError::EffectNotFound(id))?;
        let effect = self.effects.remove(index);
        registry.unregister(id);
        tracing::debug!(actor = %self.name, effect = %effect.name, "effect deleted");
        Ok(effect)
    }

    /// Roll options currently granted by effects.
    pub fn roll_options(&self) -> &BTreeSet<String> {
        &self.roll_options
    }

    /// Returns true if an effect grants the given roll option.
    pub fn has_roll_option(&self, option: &str) -> bool {
        self.roll_options.contains(option)
    }

    /// Re-attach effects after deserialization, where ownership is implicit.
    pub fn claim_effects(&mut self) {
        for effect in &mut self.effects {
            effect.actor = Some(self.id);
        }
    }
}

impl Prepare for Actor {
    fn prepare_base_data(&mut self) {
        self.roll_options.clear();
        for effect in &mut self.effects {
            effect.prepare_base_data();
        }
    }

    fn prepare_derived_data(&mut self, registry: &mut dyn EffectRegistry) {
        for effect in &mut self.effects {
            self.roll_options.insert(effect.roll_option());
            effect.prepare_derived_data(registry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{DurationConfig, DurationUnit};
    use crate::start::StartRecord;
    use crate::tracker::EffectTracker;

    fn bless() -> Effect {
        Effect::from_parts(
            "Bless",
            DurationConfig::new(DurationUnit::Minutes, 1.0),
            StartRecord::default(),
        )
    }

    #[test]
    fn add_effect_claims_ownership() {
        let mut actor = Actor::new("Kyra");
        let id = actor.add_effect(bless()).unwrap();
        assert_eq!(actor.effect(id).unwrap().actor, Some(actor.id));
    }

    #[test]
    fn add_same_effect_twice_fails() {
        let mut actor = Actor::new("Kyra");
        let effect = bless();
        actor.add_effect(effect.clone()).unwrap();
        assert!(matches!(
            actor.add_effect(effect),
            Err(EffectError::DuplicateEffect(_))
        ));
    }

    #[test]
    fn prepare_grants_roll_options_and_registers() {
        let mut actor = Actor::new("Kyra");
        actor.add_effect(bless()).unwrap();
        actor
            .add_effect(
                Effect::from_parts("Shield Spell", DurationConfig::unlimited(), StartRecord::default())
                    .with_slug("spell-effect-shield"),
            )
            .unwrap();

        let mut tracker = EffectTracker::default();
        actor.prepare_data(&mut tracker);

        assert!(actor.has_roll_option("bless"));
        assert!(actor.has_roll_option("spell-effect-shield"));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn repeated_preparation_does_not_duplicate() {
        let mut actor = Actor::new("Kyra");
        actor.add_effect(bless()).unwrap();
        let mut tracker = EffectTracker::default();
        actor.prepare_data(&mut tracker);
        actor.prepare_data(&mut tracker);
        assert_eq!(tracker.len(), 1);
        assert_eq!(actor.roll_options().len(), 1);
    }

    #[test]
    fn delete_effect_unregisters_and_drops_roll_option() {
        let mut actor = Actor::new("Kyra");
        let id = actor.add_effect(bless()).unwrap();
        let mut tracker = EffectTracker::default();
        actor.prepare_data(&mut tracker);

        let removed = actor.delete_effect(id, &mut tracker).unwrap();
        assert_eq!(removed.name, "Bless");
        assert!(tracker.is_empty());

        actor.prepare_data(&mut tracker);
        assert!(!actor.has_roll_option("bless"));
    }

    #[test]
    fn delete_unknown_effect_fails() {
        let mut actor = Actor::new("Kyra");
        let mut tracker = EffectTracker::default();
        assert!(matches!(
            actor.delete_effect(EntityId::new(), &mut tracker),
            Err(EffectError::EffectNotFound(_))
        ));
    }

    #[test]
    fn update_effect_normalizes() {
        let mut actor = Actor::new("Kyra");
        let id = actor.add_effect(bless()).unwrap();
        actor
            .update_effect(id, DurationUpdate::default().value(-1.0))
            .unwrap();
        assert_eq!(actor.effect(id).unwrap().duration().value(), 1.0);
    }

    #[test]
    fn claim_effects_after_deserialize() {
        let mut actor: Actor = serde_json::from_str(
            r#"{"name":"Kyra","effects":[{"name":"Bless","duration":{"unit":"minutes","value":1}}]}"#,
        )
        .unwrap();
        assert_eq!(actor.effects()[0].actor, None);
        actor.claim_effects();
        assert_eq!(actor.effects()[0].actor, Some(actor.id));
    }
}
