use wz_core::EntityId;

/// Alias for `Result<T, EffectError>`.
pub type EffectResult<T> = Result<T, EffectError>;

/// Errors raised while managing effects on an actor.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The actor holds no effect with this id.
    #[error("effect not found: {0}")]
    EffectNotFound(EntityId),

    /// The actor already holds an effect with this id.
    #[error("effect already attached: {0}")]
    DuplicateEffect(EntityId),
}
