use wz_core::EntityId;

use crate::effect::Effect;

/// Something that can be told which effects to watch.
///
/// Registrations are keyed by effect id. Registering the same effect again
/// replaces the earlier snapshot.
pub trait EffectRegistry {
    /// Start (or keep) tracking an effect.
    fn register(&mut self, effect: &Effect);

    /// Stop tracking an effect. Unknown ids are ignored.
    fn unregister(&mut self, id: EntityId);
}

/// A game entity with the data-preparation passes of a document.
///
/// Base preparation enforces invariants on the entity's own data. Derived
/// preparation computes anything that depends on other entities and hooks
/// the entity up to the registry.
pub trait Prepare {
    /// Normalize the entity's own data.
    fn prepare_base_data(&mut self);

    /// Compute derived data and register with collaborators.
    fn prepare_derived_data(&mut self, registry: &mut dyn EffectRegistry);

    /// Run both passes in order.
    fn prepare_data(&mut self, registry: &mut dyn EffectRegistry) {
        self.prepare_base_data();
        self.prepare_derived_data(registry);
    }
}
